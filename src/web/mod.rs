//! Web retrieval: search engine queries and page scraping
//!
//! Both concerns sit behind traits so the research stage can run against the
//! live web or against canned fixtures.

mod mock;
mod scrape;
mod search;
mod types;

pub use mock::{MockScraper, MockSearch};
pub use scrape::{visible_text, HttpScraper, PageScraper, MAX_PAGE_CHARS};
pub use search::{parse_results, DuckDuckGoSearch, WebSearch};
pub use types::{ScrapeMethod, ScrapedPage, SearchHit};

use anyhow::{Context, Result};
use std::time::Duration;

pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Builds a reqwest client that looks like a desktop browser
pub(crate) fn browser_client(timeout: Duration) -> Result<reqwest::Client> {
    use reqwest::header::{self, HeaderMap, HeaderValue};

    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("Failed to create HTTP client")
}
