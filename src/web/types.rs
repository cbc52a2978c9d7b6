use serde::{Deserialize, Serialize};

/// One organic result from a search engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// How a source's content was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    /// Page fetched over plain HTTP
    #[serde(alias = "requests", alias = "selenium")]
    Http,
    /// Nothing fetched; only the search snippet is available
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub content: String,
    pub success: bool,
    pub method: ScrapeMethod,
}

impl ScrapedPage {
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: "Failed to load".to_string(),
            content: String::new(),
            success: false,
            method: ScrapeMethod::None,
        }
    }
}
