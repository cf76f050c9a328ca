// Two-stage crawl: listing page -> concurrent detail pages
use crate::config::{AppConfig, ParseFailure, SiteConfig};
use crate::model::{CrawlError, ExtractError, FetchError, Job};
use crate::parser::{parse_listing, DetailParser};
use crate::scraper::Fetcher;
use crate::storage::VisitedStore;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_concurrency: usize,
    pub detail_timeout: Duration,
    pub parse_failure: ParseFailure,
}

impl CrawlOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            detail_timeout: config.detail_timeout(),
            parse_failure: config.parse_failure,
        }
    }
}

/// Result of one detail URL in stage B.
enum DetailOutcome {
    Extracted(Job),
    AlreadyVisited,
    Failed,
}

pub struct Crawler<F, S> {
    fetcher: F,
    storage: Arc<Mutex<S>>,
    parser: DetailParser,
    site: SiteConfig,
    options: CrawlOptions,
}

impl<F, S> Crawler<F, S>
where
    F: Fetcher,
    S: VisitedStore,
{
    pub fn new(
        fetcher: F,
        storage: Arc<Mutex<S>>,
        site: SiteConfig,
        options: CrawlOptions,
    ) -> Result<Self, ExtractError> {
        let parser = DetailParser::new(site.timezone())?;
        Ok(Self {
            fetcher,
            storage,
            parser,
            site,
            options,
        })
    }

    /// Runs both stages and returns the jobs extracted from pages not seen
    /// in earlier runs, in completion order.
    pub async fn crawl(&self) -> Result<Vec<Job>, CrawlError> {
        let detail_urls = self.discover().await?;
        let discovered = detail_urls.len();
        info!("Discovered {} detail links", discovered);

        let outcomes: Vec<DetailOutcome> = stream::iter(detail_urls)
            .map(|url| self.process_detail(url))
            .buffer_unordered(self.options.max_concurrency)
            .try_collect()
            .await?;

        let mut jobs = Vec::new();
        let (mut visited, mut failed) = (0, 0);
        for outcome in outcomes {
            match outcome {
                DetailOutcome::Extracted(job) => jobs.push(job),
                DetailOutcome::AlreadyVisited => visited += 1,
                DetailOutcome::Failed => failed += 1,
            }
        }

        info!(
            discovered,
            already_visited = visited,
            failed,
            extracted = jobs.len(),
            "Crawl finished"
        );
        Ok(jobs)
    }

    /// Stage A: fetch the listing page and collect unique, allowed detail URLs.
    async fn discover(&self) -> Result<Vec<Url>, CrawlError> {
        let listing_url = &self.site.listing_url;
        let base = Url::parse(listing_url).map_err(|e| CrawlError::Listing {
            url: listing_url.clone(),
            source: FetchError::InvalidUrl(e.to_string()),
        })?;

        info!("Fetching listing page {}", base);
        let html = self
            .fetcher
            .fetch(&base)
            .await
            .map_err(|source| CrawlError::Listing {
                url: listing_url.clone(),
                source,
            })?;

        let links = parse_listing(&html, &base).map_err(|source| CrawlError::ListingParse {
            url: listing_url.clone(),
            source,
        })?;

        let mut seen = HashSet::new();
        let urls = links
            .into_iter()
            .filter(|url| {
                let allowed = self.is_allowed(url);
                if !allowed {
                    debug!(%url, "link outside allowed domains dropped");
                }
                allowed
            })
            .filter(|url| seen.insert(url.as_str().to_string()))
            .collect();
        Ok(urls)
    }

    fn is_allowed(&self, url: &Url) -> bool {
        let allowed = &self.site.allowed_domains;
        allowed.is_empty()
            || url
                .host_str()
                .is_some_and(|host| allowed.iter().any(|d| d.eq_ignore_ascii_case(host)))
    }

    /// Stage B for one URL. Only an extraction failure under
    /// [`ParseFailure::Abort`] escapes as an error.
    async fn process_detail(&self, url: Url) -> Result<DetailOutcome, CrawlError> {
        let key = url.as_str();

        match self.storage.lock().await.contains(key) {
            Ok(true) => {
                debug!(url = key, "already visited");
                return Ok(DetailOutcome::AlreadyVisited);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(url = key, error = %e, "visited check failed, skipping");
                return Ok(DetailOutcome::Failed);
            }
        }

        let fetched = match timeout(self.options.detail_timeout, self.fetcher.fetch(&url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.options.detail_timeout)),
        };
        let html = match fetched {
            Ok(html) => html,
            Err(e) => {
                warn!(url = key, error = %e, "error when visiting job url");
                return Ok(DetailOutcome::Failed);
            }
        };

        if let Err(e) = self.storage.lock().await.add(key) {
            warn!(url = key, error = %e, "failed to record visited url");
        }

        match self.parser.parse(&html, key) {
            Ok(job) => {
                info!(
                    title = %job.title,
                    categories = ?job.categories,
                    provinces = ?job.provinces,
                    locations = ?job.locations,
                    subjects = ?job.subjects,
                    published_at = ?job.published_at,
                    expire_at = ?job.expire_at,
                    meta_entries = job.meta.len(),
                    body_len = job.body.len(),
                    "job fetched"
                );
                Ok(DetailOutcome::Extracted(job))
            }
            Err(ExtractError::NotDetailPage) => {
                warn!(url = key, "not a job detail page, skipping");
                Ok(DetailOutcome::Failed)
            }
            Err(e) => match self.options.parse_failure {
                ParseFailure::Skip => {
                    warn!(url = key, error = %e, "job extraction failed, skipping");
                    Ok(DetailOutcome::Failed)
                }
                ParseFailure::Abort => Err(CrawlError::Extract {
                    url: key.to_string(),
                    source: e,
                }),
            },
        }
    }
}
