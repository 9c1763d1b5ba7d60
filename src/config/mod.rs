//! Crawl configuration
//!
//! The configuration comes straight from the command line: a seed URL, a
//! global concurrency cap, and a page budget. Validation happens once, before
//! any network activity.

use crate::{ConfigError, ConfigResult};
use url::Url;

/// Default number of concurrent fetch-and-extract operations
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Default maximum number of successfully extracted pages
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Configuration for a single crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The URL the crawl starts from; its host bounds the crawl scope
    pub seed_url: String,

    /// Maximum number of fetch-and-extract operations running at once
    pub max_concurrency: usize,

    /// Maximum number of successfully extracted pages before the crawl stops
    pub max_pages: usize,
}

impl CrawlConfig {
    /// Creates a configuration with the default concurrency and page budget
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Validates the configuration, returning the parsed seed URL
    ///
    /// Rejects `max_concurrency` or `max_pages` below 1 and seed URLs that
    /// fail to parse or use a non-HTTP scheme. Runs before the crawler opens
    /// any connection.
    pub fn validate(&self) -> ConfigResult<Url> {
        if self.max_concurrency < 1 {
            return Err(ConfigError::Validation(
                "max_concurrency must be a positive integer".to_string(),
            ));
        }

        if self.max_pages < 1 {
            return Err(ConfigError::Validation(
                "max_pages must be a positive integer".to_string(),
            ));
        }

        let seed = Url::parse(&self.seed_url)
            .map_err(|e| ConfigError::InvalidSeedUrl(format!("{}: {}", self.seed_url, e)))?;

        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(ConfigError::InvalidSeedUrl(format!(
                "unsupported scheme '{}' in {}",
                seed.scheme(),
                self.seed_url
            )));
        }

        if seed.host_str().is_none() {
            return Err(ConfigError::InvalidSeedUrl(format!(
                "no host in {}",
                self.seed_url
            )));
        }

        Ok(seed)
    }
}
