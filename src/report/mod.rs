//! CSV report writer
//!
//! Serializes the final crawl result map to a CSV file. Rows are sorted by
//! normalized key so the report is deterministic regardless of the order in
//! which pages finished crawling.

use crate::crawler::PageRecord;
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// One row of the CSV report
///
/// Field names double as the header row. Multi-valued fields are joined with
/// `;`; the csv writer quotes any field containing a comma, quote, or
/// newline and doubles internal quotes.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    page_url: &'a str,
    h1: &'a str,
    first_paragraph: &'a str,
    outgoing_link_urls: String,
    image_urls: String,
}

/// Writes the crawl results to a CSV file at `path`
///
/// An empty result map writes nothing; the caller gets `Ok(())` and an
/// informational log line instead of an empty file.
pub fn write_csv_report(pages: &HashMap<String, PageRecord>, path: &Path) -> Result<()> {
    if pages.is_empty() {
        tracing::info!("no pages crawled, skipping report");
        return Ok(());
    }

    let mut keys: Vec<&String> = pages.keys().collect();
    keys.sort();

    let mut writer = csv::Writer::from_path(path)?;

    for key in keys {
        let page = &pages[key];
        writer.serialize(ReportRow {
            page_url: &page.url,
            h1: &page.h1,
            first_paragraph: &page.first_paragraph,
            outgoing_link_urls: page.outgoing_links.join(";"),
            image_urls: page.image_urls.join(";"),
        })?;
    }

    writer.flush()?;
    tracing::info!("report written to {}", path.display());

    Ok(())
}
