pub mod sqlite;

pub use sqlite::SqliteVisitedStore;

use crate::model::StorageError;

/// Durable set of detail URLs already fetched by any previous run.
pub trait VisitedStore: Send {
    fn contains(&self, url: &str) -> Result<bool, StorageError>;
    fn add(&self, url: &str) -> Result<(), StorageError>;
}
