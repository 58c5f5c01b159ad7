//! Index page download
//!
//! A single unauthenticated GET of a fixed URL. The body is returned as text
//! and handed to the rank parser.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use thiserror::Error;

/// Default index page URL
pub const DEFAULT_SOURCE_URL: &str = "https://www.tiobe.com/tiobe-index/";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Something that can produce the index page text
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;

    /// Where the document comes from, for logging
    fn describe(&self) -> &str;
}

/// Fetches the index page over HTTP(S)
pub struct HttpSource {
    http: HttpClient,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("rankbar/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: self.url.clone(),
            source,
        };

        let response = self.http.get(&self.url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        tracing::debug!(url = %self.url, bytes = body.len(), "fetched index page");
        Ok(body)
    }

    fn describe(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tiobe-index/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<tr><td>17</td>"))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpSource::new(&format!("{}/tiobe-index/", server.uri())).unwrap();
        assert_eq!(source.fetch().await.unwrap(), "<tr><td>17</td>");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpSource::new(&server.uri()).unwrap();
        match source.fetch().await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 9 of localhost in the test environment.
        let source = HttpSource::new("http://127.0.0.1:9/").unwrap();
        assert!(matches!(
            source.fetch().await,
            Err(FetchError::Transport { .. })
        ));
    }
}
