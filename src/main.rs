mod config;
mod crawler;
mod filter;
mod model;
mod notifier;
mod parser;
mod scraper;
mod storage;
#[cfg(test)]
mod test_support;
mod utils;

use clap::Parser;
use config::{load_config, AppConfig};
use crate::scraper::{Fetcher, HttpFetcher};
use crawler::{CrawlOptions, Crawler};
use filter::filter_jobs;
use model::AppError;
use notifier::DingTalkNotifier;
use std::process::ExitCode;
use std::sync::Arc;
use storage::SqliteVisitedStore;
use tokio::sync::Mutex;
use tracing::{error, info, warn, Level};

/// Scrape new gaoxiaojob.com postings and push matches to a DingTalk robot.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Keyword to match (repeatable); replaces the keywords from the config file
    #[arg(short, long = "keyword")]
    keywords: Vec<String>,

    /// Crawl and filter but do not send anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration from file
    let mut config = match load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config load error ({}): {}", args.config, e);
            return ExitCode::FAILURE;
        }
    };
    config.debug |= args.debug;
    config.dry_run |= args.dry_run;
    if !args.keywords.is_empty() {
        config.keywords = args.keywords;
    }

    // Initialize logging
    let level = if config.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    ExitCode::from(exit_status(&run(&config).await))
}

fn exit_status(result: &Result<(), AppError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("Run failed: {}", e);
            1
        }
    }
}

/// One full pass: crawl new postings, filter by keyword, notify.
async fn run(config: &AppConfig) -> Result<(), AppError> {
    let fetcher = HttpFetcher::new(&config.site.user_agent, config.detail_timeout())?;
    run_with(config, fetcher).await
}

async fn run_with<F: Fetcher>(config: &AppConfig, fetcher: F) -> Result<(), AppError> {
    // A store that cannot be opened aborts the run.
    let storage = Arc::new(Mutex::new(SqliteVisitedStore::new(&config.storage_path)?));

    let crawler = Crawler::new(
        fetcher,
        storage.clone(),
        config.site.clone(),
        CrawlOptions::from_config(config),
    )?;

    let jobs = crawler.crawl().await?;
    info!("Fetched {} new jobs", jobs.len());
    if let Ok(total) = storage.lock().await.len() {
        info!("Visited store now holds {} urls", total);
    }

    let jobs = filter_jobs(jobs, &config.keywords);
    info!(
        filtered = jobs.len(),
        keywords = ?config.keywords,
        "Filtered new jobs"
    );

    if jobs.is_empty() {
        return Ok(());
    }
    if config.dry_run {
        for job in &jobs {
            info!("[dry-run] {} {}", job.title, job.url);
        }
        return Ok(());
    }

    let notifier = DingTalkNotifier::new(config.webhook_url.clone())?;
    if let Err(e) = notifier.notify(&jobs).await {
        warn!("Pushing {} jobs failed: {}", jobs.len(), e);
        return Err(e.into());
    }
    info!("Pushed {} jobs", jobs.len());
    Ok(())
}
