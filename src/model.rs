// Core structs: Job, plus the error types shared across the pipeline
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// One scraped posting, built once per detail page and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Job {
    pub url: String,
    pub title: String,
    /// Breadcrumb trail without the site root; the last entry is the primary category.
    pub categories: Vec<String>,
    pub subjects: Vec<String>,
    pub provinces: Vec<String>,
    pub locations: Vec<String>,
    /// Raw `label：value` pairs, both sides trimmed.
    pub meta: HashMap<String, String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub expire_at: Option<DateTime<FixedOffset>>,
    pub body: String,
}

impl Job {
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.last().map(String::as_str)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("bad selector {0}")]
    Selector(String),
    #[error("document is not a detail page")]
    NotDetailPage,
    #[error("invalid date in {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("listing page {url} unreachable: {source}")]
    Listing { url: String, source: FetchError },
    #[error("listing page {url} unparseable: {source}")]
    ListingParse { url: String, source: ExtractError },
    #[error("extraction failed for {url}: {source}")]
    Extract { url: String, source: ExtractError },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook rejected message: {code} {message}")]
    Api { code: i64, message: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("visited store: {0}")]
    Storage(#[from] StorageError),
    #[error("fetcher setup: {0}")]
    Fetch(#[from] FetchError),
    #[error("parser setup: {0}")]
    Parser(#[from] ExtractError),
    #[error(transparent)]
    Crawl(#[from] CrawlError),
    #[error("notify: {0}")]
    Notify(#[from] NotifyError),
}
