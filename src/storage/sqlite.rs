use crate::model::StorageError;
use crate::storage::VisitedStore;
use chrono::Utc;
use rusqlite::{params, Connection};

pub struct SqliteVisitedStore {
    conn: Connection,
}

impl SqliteVisitedStore {
    /// Opens (or creates) the store file and makes sure the schema exists.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS visited (
                url TEXT PRIMARY KEY,
                visited_at TEXT NOT NULL
            );
            "
        )?;

        Ok(Self { conn })
    }

    /// Number of URLs recorded so far.
    pub fn len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM visited", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl VisitedStore for SqliteVisitedStore {
    fn contains(&self, url: &str) -> Result<bool, StorageError> {
        let mut stmt = self.conn.prepare_cached("SELECT 1 FROM visited WHERE url = ?1")?;
        let mut rows = stmt.query(params![url])?;
        Ok(rows.next()?.is_some())
    }

    /// Records `url`; the first timestamp wins on repeats.
    fn add(&self, url: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO visited (url, visited_at) VALUES (?1, ?2)",
            params![url, Utc::now()],
        )?;
        Ok(())
    }
}
