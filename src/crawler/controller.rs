//! Crawl controller - concurrent crawl orchestration
//!
//! This is the concurrency-sensitive heart of the crate. It owns the shared
//! crawl state (visited set, result map, stop flag), admits discovered URLs
//! through one atomic check-and-insert, caps parallel fetch-and-extract work
//! with a semaphore, and propagates cancellation to all in-flight work once
//! the page budget is reached.
//!
//! All mutation of `visited`, `results`, and `stopped` goes through the two
//! locked operations on [`Crawler`] (`admit` and `record`); nothing else
//! touches the state.

use crate::config::CrawlConfig;
use crate::crawler::extractor::{extract_page_data, PageRecord};
use crate::crawler::fetcher::{build_http_client, fetch_html, FetchError};
use crate::url::{normalize_key, same_host};
use crate::Result;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Shared mutable crawl state, guarded by a single mutex
///
/// Invariants:
/// - a key enters `visited` atomically with the decision to fetch it
/// - `results.len() <= max_pages` at all times
/// - `stopped` transitions false -> true exactly once
#[derive(Debug, Default)]
struct CrawlState {
    /// Every key ever admitted for fetching, regardless of fetch outcome
    visited: HashSet<String>,

    /// Successful extractions only
    results: HashMap<String, PageRecord>,

    /// Once true, no new fetch starts and pending work abandons promptly
    stopped: bool,
}

/// Outcome of inserting a page record into the result map
enum Insertion {
    /// Recorded; the page's links should be followed
    Recorded,

    /// Recorded, and this insertion exhausted the page budget
    BudgetReached,

    /// The crawl stopped while this page was in flight; nothing recorded
    Stopped,
}

/// Concurrent same-origin crawler
///
/// Cloning is cheap and shares all crawl state; spawned tasks each hold a
/// clone. State is created fresh per [`Crawler`] and handed out as the
/// result map when the crawl finishes.
#[derive(Clone)]
pub struct Crawler {
    seed: Url,
    max_pages: usize,
    client: Client,
    state: Arc<Mutex<CrawlState>>,
    limiter: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl Crawler {
    /// Creates a crawler for one crawl invocation
    ///
    /// Validates the configuration and builds the HTTP client; no network
    /// activity happens here.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let seed = config.validate()?;
        let client = build_http_client()?;

        Ok(Self {
            seed,
            max_pages: config.max_pages,
            client,
            state: Arc::new(Mutex::new(CrawlState::default())),
            limiter: Arc::new(Semaphore::new(config.max_concurrency)),
            cancel: CancellationToken::new(),
        })
    }

    /// Crawls every reachable same-host page starting from the seed
    ///
    /// Returns the map of normalized key to page record. Page-level failures
    /// are logged and skipped; hitting the page budget is normal termination,
    /// not an error.
    ///
    /// Consumes the crawler: the state lives for exactly one invocation and
    /// is handed out as the result map. The crawl completes only when every
    /// spawned task has settled, including tasks spawned while earlier ones
    /// were being awaited: the join set is drained until it is empty.
    pub async fn crawl(self) -> HashMap<String, PageRecord> {
        let mut tasks: JoinSet<Vec<String>> = JoinSet::new();

        if let Some(key) = self.admit(&self.seed) {
            let crawler = self.clone();
            let url = self.seed.clone();
            tasks.spawn(async move { crawler.crawl_page(url, key).await });
        }

        while let Some(joined) = tasks.join_next().await {
            let links = match joined {
                Ok(links) => links,
                Err(e) => {
                    tracing::error!("crawl task failed: {}", e);
                    continue;
                }
            };

            for link in links {
                let url = match Url::parse(&link) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::debug!("skipping invalid link '{}': {}", link, e);
                        continue;
                    }
                };

                if let Some(key) = self.admit(&url) {
                    let crawler = self.clone();
                    tasks.spawn(async move { crawler.crawl_page(url, key).await });
                }
            }
        }

        let mut state = self.lock_state();
        tracing::info!(
            "crawl finished: {} pages extracted, {} URLs visited",
            state.results.len(),
            state.visited.len()
        );
        std::mem::take(&mut state.results)
    }

    /// Atomic admission gate for a discovered URL
    ///
    /// Discards cross-host URLs silently, then performs the check-and-insert
    /// against `stopped` and `visited` as one critical section: two
    /// concurrent discoveries of the same link can never both be accepted.
    ///
    /// Returns the normalized key when the URL is accepted for fetching.
    fn admit(&self, url: &Url) -> Option<String> {
        if !same_host(url, &self.seed) {
            return None;
        }

        let key = normalize_key(url);

        let mut state = self.lock_state();
        if state.stopped || state.visited.contains(&key) {
            return None;
        }
        state.visited.insert(key.clone());
        Some(key)
    }

    /// Fetches and extracts one admitted URL, returning its outgoing links
    ///
    /// Suspends only while waiting for a semaphore slot or for the HTTP
    /// response. A fetch failure is terminal for this page, not the crawl.
    async fn crawl_page(&self, url: Url, key: String) -> Vec<String> {
        if self.cancel.is_cancelled() {
            return Vec::new();
        }

        // Work beyond the concurrency cap queues here.
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Vec::new(),
            permit = self.limiter.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return Vec::new(),
            },
        };

        if self.cancel.is_cancelled() {
            return Vec::new();
        }

        tracing::info!("crawling {}", url);

        let html = match fetch_html(&self.client, &url, &self.cancel).await {
            Ok(html) => html,
            Err(FetchError::Cancelled) => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to fetch {}: {}", url, e);
                return Vec::new();
            }
        };

        let record = extract_page_data(&html, &url);
        let outgoing = record.outgoing_links.clone();

        match self.record(key, record) {
            Insertion::Recorded => outgoing,
            Insertion::BudgetReached => {
                tracing::info!(
                    "reached maximum of {} pages, stopping crawl",
                    self.max_pages
                );
                self.cancel.cancel();
                Vec::new()
            }
            Insertion::Stopped => Vec::new(),
        }
    }

    /// Atomic insertion of a successful extraction into the result map
    ///
    /// The budget is charged here, after successful extraction: failed
    /// fetches keep their visited slot but never count against `max_pages`.
    /// A page whose fetch completed after the crawl stopped is dropped, so
    /// the result map never exceeds the budget.
    fn record(&self, key: String, record: PageRecord) -> Insertion {
        let mut state = self.lock_state();

        if state.stopped {
            return Insertion::Stopped;
        }

        state.results.insert(key, record);

        if state.results.len() >= self.max_pages {
            state.stopped = true;
            return Insertion::BudgetReached;
        }

        Insertion::Recorded
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CrawlState> {
        self.state.lock().expect("crawl state lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler(seed: &str, max_pages: usize) -> Crawler {
        let mut config = CrawlConfig::new(seed);
        config.max_pages = max_pages;
        Crawler::new(config).unwrap()
    }

    fn record_for(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            h1: String::new(),
            first_paragraph: String::new(),
            outgoing_links: Vec::new(),
            image_urls: Vec::new(),
        }
    }

    #[test]
    fn test_admit_accepts_first_then_rejects_duplicate() {
        let crawler = crawler("https://example.com", 100);
        let url = Url::parse("https://example.com/page").unwrap();

        assert_eq!(crawler.admit(&url), Some("example.com/page".to_string()));
        assert_eq!(crawler.admit(&url), None);
    }

    #[test]
    fn test_admit_collapses_normalized_variants() {
        let crawler = crawler("https://example.com", 100);

        let https = Url::parse("https://example.com/a/").unwrap();
        let http = Url::parse("http://EXAMPLE.com/a").unwrap();

        assert!(crawler.admit(&https).is_some());
        assert!(crawler.admit(&http).is_none());
    }

    #[test]
    fn test_admit_discards_cross_host() {
        let crawler = crawler("https://example.com", 100);
        let other = Url::parse("https://other.com/page").unwrap();

        assert!(crawler.admit(&other).is_none());

        // A silent discard: the cross-host URL never enters visited.
        let state = crawler.lock_state();
        assert!(state.visited.is_empty());
    }

    #[test]
    fn test_admit_rejects_after_stop() {
        let crawler = crawler("https://example.com", 100);
        crawler.lock_state().stopped = true;

        let url = Url::parse("https://example.com/page").unwrap();
        assert!(crawler.admit(&url).is_none());
    }

    #[test]
    fn test_record_charges_budget_on_last_page() {
        let crawler = crawler("https://example.com", 2);

        let first = crawler.record("example.com/a".to_string(), record_for("a"));
        assert!(matches!(first, Insertion::Recorded));

        let second = crawler.record("example.com/b".to_string(), record_for("b"));
        assert!(matches!(second, Insertion::BudgetReached));

        let state = crawler.lock_state();
        assert!(state.stopped);
        assert_eq!(state.results.len(), 2);
    }

    #[test]
    fn test_record_drops_page_after_stop() {
        let crawler = crawler("https://example.com", 1);

        let first = crawler.record("example.com/a".to_string(), record_for("a"));
        assert!(matches!(first, Insertion::BudgetReached));

        // An in-flight fetch that completes after the stop is not recorded.
        let late = crawler.record("example.com/b".to_string(), record_for("b"));
        assert!(matches!(late, Insertion::Stopped));

        let state = crawler.lock_state();
        assert_eq!(state.results.len(), 1);
    }

    #[test]
    fn test_results_never_exceed_budget() {
        let crawler = crawler("https://example.com", 3);

        for i in 0..10 {
            let key = format!("example.com/p{}", i);
            crawler.record(key, record_for("p"));
        }

        let state = crawler.lock_state();
        assert!(state.results.len() <= 3);
    }

    #[test]
    fn test_every_result_key_was_admitted() {
        let crawler = crawler("https://example.com", 100);

        for path in ["/a", "/b", "/c"] {
            let url = Url::parse(&format!("https://example.com{}", path)).unwrap();
            let key = crawler.admit(&url).unwrap();
            crawler.record(key, record_for(path));
        }

        let state = crawler.lock_state();
        assert!(state.results.keys().all(|k| state.visited.contains(k)));
    }

    #[tokio::test]
    async fn test_crawl_consumes_crawler_and_settles_on_unreachable_seed() {
        // Connection refused on the seed: the crawl still reaches quiescence
        // and hands back an empty result map. `crawl` takes the crawler by
        // value, so a second invocation on stale state cannot compile.
        let crawler = crawler("http://127.0.0.1:9", 10);
        let pages = crawler.crawl().await;
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_crawl_page_abandons_when_cancelled() {
        let crawler = crawler("https://example.com", 100);
        crawler.cancel.cancel();

        let url = Url::parse("https://example.com/page").unwrap();
        let links = crawler.crawl_page(url, "example.com/page".to_string()).await;
        assert!(links.is_empty());

        // Abandoned without a fetch attempt: nothing recorded.
        assert!(crawler.lock_state().results.is_empty());
    }
}
