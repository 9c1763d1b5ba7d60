//! Sitescan main entry point
//!
//! Command-line interface for the same-origin web crawler.

use anyhow::Context;
use clap::{ArgAction, Parser};
use sitescan::config::{CrawlConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_PAGES};
use sitescan::crawler::crawl_site;
use sitescan::report::write_csv_report;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Sitescan: crawl a site and report structured page data
///
/// Starting from the seed URL, sitescan fetches every reachable page on the
/// same host, extracts the title, first paragraph, links, and images from
/// each, and writes the results to report.csv in the current directory.
#[derive(Parser, Debug)]
#[command(name = "sitescan")]
#[command(version)]
#[command(disable_version_flag = true)]
#[command(about = "Crawl a site and report structured page data", long_about = None)]
struct Cli {
    /// Seed URL; the crawl never leaves this URL's host
    #[arg(value_name = "SEED_URL")]
    seed_url: String,

    /// Maximum number of concurrent fetches
    #[arg(value_name = "MAX_CONCURRENCY", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,

    /// Maximum number of pages to crawl
    #[arg(value_name = "MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage-class argument errors exit 1; help and version keep exiting 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    setup_logging();

    let config = CrawlConfig {
        seed_url: cli.seed_url,
        max_concurrency: cli.max_concurrency,
        max_pages: cli.max_pages,
    };

    tracing::info!(
        "Crawling {} (concurrency={}, maxPages={})",
        config.seed_url,
        config.max_concurrency,
        config.max_pages
    );

    let pages = crawl_site(config).await.context("crawl failed")?;

    write_csv_report(&pages, Path::new("report.csv")).context("failed to write report")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` overrides the default filter when set.
fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sitescan=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
