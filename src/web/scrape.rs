use super::browser_client;
use super::types::{ScrapeMethod, ScrapedPage};
use crate::util::text::{collapse_whitespace, truncate_chars};
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on the text kept from a single page
pub const MAX_PAGE_CHARS: usize = 5000;

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "iframe", "noscript",
];

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetches a page. Transport failures are reported as an unsuccessful
    /// page, not an error.
    async fn scrape(&self, url: &str) -> ScrapedPage;
}

/// Static-HTML scraper; pages that need JavaScript yield little text
pub struct HttpScraper {
    client: reqwest::Client,
}

impl HttpScraper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(10))?,
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn scrape(&self, url: &str) -> ScrapedPage {
        debug!(url, "Scraping page");

        match self.fetch_html(url).await {
            Ok(html) => {
                let document = Html::parse_document(&html);
                let content = visible_text(&document);
                debug!(url, chars = content.len(), "Scraped page");

                ScrapedPage {
                    url: url.to_string(),
                    title: extract_title(&document).unwrap_or_else(|| "No title".to_string()),
                    content: truncate_chars(&content, MAX_PAGE_CHARS).to_string(),
                    success: true,
                    method: ScrapeMethod::Http,
                }
            }
            Err(e) => {
                warn!(url, error = %e, "Scrape failed");
                ScrapedPage::failed(url)
            }
        }
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;
    document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Readable text of a document with boilerplate subtrees removed, one
/// phrase per line
pub fn visible_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    collapse_whitespace(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_boilerplate() {
        let html = r#"
            <html><head><title>Acme</title><style>body { color: red; }</style></head>
            <body>
              <header>Site header</header>
              <nav><a href="/">Home</a></nav>
              <main><h1>Acme Robotics</h1><p>We   build robots.  Fast ones.</p></main>
              <script>var tracking = true;</script>
              <noscript>Enable JS</noscript>
              <footer>Copyright</footer>
            </body></html>
        "#;
        let text = visible_text(&Html::parse_document(html));

        assert!(text.contains("Acme Robotics"));
        assert!(text.contains("Fast ones."));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Enable JS"));
        assert!(!text.contains("Copyright"));
        assert!(!text.lines().any(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_extract_title() {
        let doc = Html::parse_document("<html><head><title> Acme | Home </title></head></html>");
        assert_eq!(extract_title(&doc).as_deref(), Some("Acme | Home"));

        let untitled = Html::parse_document("<html><body>hi</body></html>");
        assert!(extract_title(&untitled).is_none());
    }

    #[test]
    fn test_failed_page_shape() {
        let page = ScrapedPage::failed("https://down.example");
        assert!(!page.success);
        assert_eq!(page.method, ScrapeMethod::None);
        assert!(page.content.is_empty());
    }
}
