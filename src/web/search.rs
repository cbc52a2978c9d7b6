use super::types::SearchHit;
use super::{browser_client, BROWSER_USER_AGENT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &str;
}

/// Queries the JavaScript-free DuckDuckGo endpoint and parses its HTML
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(10))?,
            endpoint: DUCKDUCKGO_HTML_URL.to_string(),
        })
    }

    /// Points the client at a different endpoint serving the same markup
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        debug!(query, "Searching DuckDuckGo");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .context("Search request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Search returned HTTP {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read search response")?;

        let hits = parse_results(&body, max_results);
        info!(query, hits = hits.len(), "Search complete");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Extracts up to `max_results` hits from a DuckDuckGo HTML results page
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);

    let (Ok(result_sel), Ok(title_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse("a.result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&result_sel)
        .take(max_results)
        .filter_map(|result| {
            let title_el = result.select(&title_sel).next()?;
            let title = title_el.text().collect::<String>().trim().to_string();
            let href = title_el.value().attr("href").unwrap_or_default();
            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(|s| s.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            Some(SearchHit {
                title,
                url: resolve_redirect(href),
                snippet,
            })
        })
        .collect()
}

/// Unwraps DuckDuckGo's `/l/?uddg=<target>` redirect links
fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(url) if url.path().starts_with("/l/") => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        _ => absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const RESULTS_PAGE: &str = r##"
        <html><body>
        <div class="result results_links">
          <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Facme.example%2Fabout&amp;rut=abc">Acme Robotics - About</a></h2>
          <a class="result__snippet" href="#">Acme builds <b>warehouse</b> robots.</a>
        </div>
        <div class="result">
          <h2><a class="result__a" href="https://news.example/acme">Acme raises seed</a></h2>
        </div>
        <div class="result"><span>sponsored, no title link</span></div>
        <div class="result">
          <h2><a class="result__a" href="https://third.example/">Third</a></h2>
        </div>
        </body></html>
    "##;

    #[test]
    fn test_parse_results_extracts_hits() {
        let hits = parse_results(RESULTS_PAGE, 5);
        assert_eq!(hits.len(), 3);

        assert_eq!(hits[0].title, "Acme Robotics - About");
        assert_eq!(hits[0].url, "https://acme.example/about");
        assert_eq!(hits[0].snippet, "Acme builds warehouse robots.");

        assert_eq!(hits[1].url, "https://news.example/acme");
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn test_parse_results_limit_counts_result_blocks() {
        let hits = parse_results(RESULTS_PAGE, 2);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_results("<html><body>No results.</body></html>", 5).is_empty());
    }

    /// Serves one canned results page and hands back the request line
    async fn serve_once(listener: TcpListener, body: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_search_against_local_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/html/", listener.local_addr().unwrap());
        let server = tokio::spawn(serve_once(listener, RESULTS_PAGE));

        let search = DuckDuckGoSearch::new().unwrap().with_endpoint(endpoint);
        let hits = search.search("Acme Robotics funding", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://acme.example/about");
        assert_eq!(hits[1].title, "Acme raises seed");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("POST /html/?q=Acme%20Robotics%20funding "));
    }

    #[test]
    fn test_resolve_redirect_passthrough() {
        assert_eq!(
            resolve_redirect("https://example.com/page"),
            "https://example.com/page"
        );
        assert_eq!(resolve_redirect("not a url"), "not a url");
    }
}
