use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// What the crawler does with a detail page whose fields fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseFailure {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_listing_url")]
    pub listing_url: String,
    /// Hosts detail links may point at. Empty means no restriction.
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
    /// Offset used to anchor scraped dates; the site publishes in Asia/Shanghai.
    #[serde(default = "default_utc_offset_seconds")]
    pub utc_offset_seconds: i32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    pub webhook_url: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_detail_timeout_seconds")]
    pub detail_timeout_seconds: u64,
    #[serde(default)]
    pub parse_failure: ParseFailure,
    #[serde(default)]
    pub site: SiteConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            allowed_domains: default_allowed_domains(),
            utc_offset_seconds: default_utc_offset_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl SiteConfig {
    /// Falls back to UTC when the configured offset is out of range.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }
}

impl AppConfig {
    /// Never zero; a zero timeout would fail every request, the listing included.
    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_seconds.max(1))
    }
}

fn default_listing_url() -> String {
    "http://www.gaoxiaojob.com/".to_string()
}

fn default_allowed_domains() -> Vec<String> {
    vec!["www.gaoxiaojob.com".to_string()]
}

fn default_utc_offset_seconds() -> i32 {
    8 * 3600
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) GaoxiaoSniperBot/0.1".to_string()
}

fn default_storage_path() -> String {
    "visited.db".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_detail_timeout_seconds() -> u64 {
    30
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = serde_json::from_str(&content)?;
    config.max_concurrency = config.max_concurrency.max(1);
    config.detail_timeout_seconds = config.detail_timeout_seconds.max(1);
    Ok(config)
}
