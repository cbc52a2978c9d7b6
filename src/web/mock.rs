//! Offline stand-ins for the search engine and scraper

use super::scrape::PageScraper;
use super::search::WebSearch;
use super::types::{ScrapeMethod, ScrapedPage, SearchHit};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns the first registered hit list whose key appears in the query
/// (case-insensitive); unmatched queries get no hits.
#[derive(Default)]
pub struct MockSearch {
    hits: Mutex<Vec<(String, Vec<SearchHit>)>>,
    fallback: Mutex<Vec<SearchHit>>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(self, query_fragment: &str, hits: Vec<SearchHit>) -> Self {
        if let Ok(mut registered) = self.hits.lock() {
            registered.push((query_fragment.to_lowercase(), hits));
        }
        self
    }

    /// Hits returned for any query without a more specific match
    pub fn with_fallback(self, hits: Vec<SearchHit>) -> Self {
        if let Ok(mut fallback) = self.fallback.lock() {
            *fallback = hits;
        }
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WebSearch for MockSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        let lowered = query.to_lowercase();
        let registered = self
            .hits
            .lock()
            .map_err(|_| anyhow::anyhow!("mock search lock poisoned"))?;

        let hits = registered
            .iter()
            .find(|(fragment, _)| lowered.contains(fragment.as_str()))
            .map(|(_, hits)| hits.clone())
            .or_else(|| self.fallback.lock().ok().map(|f| f.clone()))
            .unwrap_or_default();

        Ok(hits.into_iter().take(max_results).collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Serves registered page bodies; unknown URLs fail like an unreachable host
#[derive(Default)]
pub struct MockScraper {
    pages: HashMap<String, (String, String)>,
    scraped: Mutex<Vec<String>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, title: &str, content: &str) -> Self {
        self.pages
            .insert(url.to_string(), (title.to_string(), content.to_string()));
        self
    }

    pub fn scraped_urls(&self) -> Vec<String> {
        self.scraped.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn scrape(&self, url: &str) -> ScrapedPage {
        if let Ok(mut scraped) = self.scraped.lock() {
            scraped.push(url.to_string());
        }

        match self.pages.get(url) {
            Some((title, content)) => ScrapedPage {
                url: url.to_string(),
                title: title.clone(),
                content: content.clone(),
                success: true,
                method: ScrapeMethod::Http,
            },
            None => ScrapedPage::failed(url),
        }
    }
}
