use crate::model::FetchError;
use url::Url;

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the decoded document body for `url`.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}
