use crate::types::RawPage;
use anyhow::{Context, Result};
use k2bib_model::Identifier;
use std::time::Duration;

/// Where the K2 mission publishes one plain-text page per GO proposal.
pub const DEFAULT_BASE_URL: &str = "https://keplerscience.arc.nasa.gov/data/k2-programs";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client settings for fetching proposal pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base path the identifier is appended to (`{base_url}/{id}.txt`).
    pub base_url: String,
    /// Verify TLS certificates. Turning this off reproduces how the
    /// program pages were historically scraped and should stay opt-in.
    pub verify_tls: bool,
    /// Upper bound on a single request, connect through body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("k2bib/{} (K2 proposal citation tool)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// The page URL for one proposal.
    pub fn page_url(&self, id: &Identifier) -> String {
        format!("{}/{id}.txt", self.base_url.trim_end_matches('/'))
    }
}

/// Anything that can produce the raw page for a proposal.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, id: &Identifier) -> Result<RawPage>;
}

/// Fetches proposal pages over HTTP, one GET per identifier.
///
/// No retries: a connection failure or timeout is returned to the caller.
pub struct PageFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        if !config.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Fetch and classify the page for one identifier.
    pub async fn fetch(&self, id: &Identifier) -> Result<RawPage> {
        let url = self.config.page_url(id);
        tracing::debug!(url = %url, "Fetching proposal page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;
        tracing::debug!(status = %status, bytes = body.len(), "Received page");

        let page = RawPage::from_body(&url, &body);
        if !status.is_success() && !page.is_not_found() {
            tracing::warn!(status = %status, url = %url, "Unexpected HTTP status without a not-found page");
        }
        Ok(page)
    }
}

impl PageSource for PageFetcher {
    async fn fetch_page(&self, id: &Identifier) -> Result<RawPage> {
        self.fetch(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn config_for(server: &MockServer) -> FetchConfig {
        FetchConfig {
            base_url: server.uri(),
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_page_url() {
        let config = FetchConfig::default();
        assert_eq!(
            config.page_url(&id("GO5023")),
            "https://keplerscience.arc.nasa.gov/data/k2-programs/GO5023.txt"
        );
    }

    #[test]
    fn test_page_url_trailing_slash() {
        let config = FetchConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..FetchConfig::default()
        };
        assert_eq!(config.page_url(&id("GO1001")), "http://localhost:8080/GO1001.txt");
    }

    #[test]
    fn test_default_verifies_tls() {
        assert!(FetchConfig::default().verify_tls);
    }

    #[tokio::test]
    async fn test_fetch_found() {
        let server = MockServer::start().await;
        let body = "Title: Foo (bar)\nPI: Jane D.\nCoIs: John S.\n\nSome abstract text.\n";
        Mock::given(method("GET"))
            .and(path("/GO5023.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(config_for(&server)).unwrap();
        let page = fetcher.fetch(&id("GO5023")).await.unwrap();

        assert_eq!(page.text(), Some(body));
        assert_eq!(page.url(), format!("{}/GO5023.txt", server.uri()));
    }

    #[tokio::test]
    async fn test_fetch_not_found_by_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/GO9999.txt"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string("<html><head><title>404 Not Found</title></head><body></body></html>"),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(config_for(&server)).unwrap();
        let page = fetcher.fetch_page(&id("GO9999")).await.unwrap();
        assert!(page.is_not_found());
    }

    #[tokio::test]
    async fn test_marker_wins_over_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>404 Not Found</h1>"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(config_for(&server)).unwrap();
        assert!(fetcher.fetch(&id("GO1001")).await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_connection_error_surfaces() {
        // Bind then drop a listener so the port is known to be closed.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let config = FetchConfig {
            base_url: format!("http://{addr}"),
            timeout: Duration::from_secs(2),
            ..FetchConfig::default()
        };
        let fetcher = PageFetcher::new(config).unwrap();
        assert!(fetcher.fetch(&id("GO1001")).await.is_err());
    }
}
