//! PageFetcher - one browser-like GET against the listing page.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;

use crate::AdapterError;

/// The public online list this tool was written for.
pub const DEFAULT_LISTING_URL: &str = "https://ntoultimate.com.br/onlinelist.php";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";

/// Downloads the raw listing markup.
///
/// There are no retries: the scheduler's cadence is the retry mechanism.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    url: String,
}

impl PageFetcher {
    /// Create a new builder for configuring the fetcher.
    pub fn builder() -> PageFetcherBuilder {
        PageFetcherBuilder::default()
    }

    /// The URL this fetcher requests.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one GET and return the body of a 2xx response.
    pub async fn fetch(&self) -> Result<String, AdapterError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AdapterError::NotFound(self.url.clone()));
        }
        if !status.is_success() {
            return Err(AdapterError::Http(format!(
                "Listing returned status {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}

/// Builder for PageFetcher.
#[derive(Debug, Default)]
pub struct PageFetcherBuilder {
    url: Option<String>,
    timeout: Option<Duration>,
}

impl PageFetcherBuilder {
    /// Set the listing URL (default: [`DEFAULT_LISTING_URL`]).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 15 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> PageFetcher {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(15));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()
            .expect("Failed to build HTTP client");

        PageFetcher {
            client,
            url: self
                .url
                .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string()),
        }
    }
}

// Headers approximating a desktop Chrome; the site serves bots differently.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let fetcher = PageFetcher::builder().build();
        assert_eq!(fetcher.url(), DEFAULT_LISTING_URL);
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/onlinelist.php")
            .match_header("user-agent", BROWSER_USER_AGENT)
            .match_header("accept-language", BROWSER_ACCEPT_LANGUAGE)
            .with_status(200)
            .with_body("<table></table>")
            .create_async()
            .await;

        let fetcher = PageFetcher::builder()
            .url(format!("{}/onlinelist.php", server.url()))
            .build();

        assert_eq!(fetcher.fetch().await.unwrap(), "<table></table>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/onlinelist.php")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = PageFetcher::builder()
            .url(format!("{}/onlinelist.php", server.url()))
            .build();

        match fetcher.fetch().await {
            Err(AdapterError::Http(msg)) => assert!(msg.contains("503")),
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_page() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.php")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = PageFetcher::builder()
            .url(format!("{}/gone.php", server.url()))
            .build();

        assert!(matches!(
            fetcher.fetch().await,
            Err(AdapterError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 9 locally.
        let fetcher = PageFetcher::builder()
            .url("http://127.0.0.1:9/onlinelist.php")
            .timeout(Duration::from_secs(2))
            .build();

        assert!(fetcher.fetch().await.is_err());
    }
}
