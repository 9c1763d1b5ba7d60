//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with cancellation support
//! - HTML parsing and structured page extraction
//! - Concurrency-capped crawl orchestration

mod controller;
mod extractor;
mod fetcher;

pub use controller::Crawler;
pub use extractor::{extract_page_data, PageRecord};
pub use fetcher::{build_http_client, fetch_html, FetchError};

use crate::config::CrawlConfig;
use crate::Result;
use std::collections::HashMap;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It validates the
/// configuration, builds the HTTP client, crawls every reachable same-host
/// page under the concurrency cap and page budget, and returns the map of
/// normalized key to extracted page record.
///
/// Page-level failures are logged and skipped; only configuration problems
/// surface as errors.
pub async fn crawl_site(config: CrawlConfig) -> Result<HashMap<String, PageRecord>> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.crawl().await)
}
