//! Sitescan: a same-origin concurrent web crawler
//!
//! This crate crawls every page reachable from a seed URL on the same host,
//! extracts structured data from each page, and writes a CSV report of the
//! results.

pub mod config;
pub mod crawler;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for sitescan operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Report error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeedUrl(String),
}

/// Result type alias for sitescan operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::CrawlConfig;
pub use crate::crawler::{Crawler, PageRecord};
pub use crate::url::{normalize_key, same_host};
