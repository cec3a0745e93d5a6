//! Single-URL fetcher (spec §4.2): one HTTP GET, 15s wall timeout, UA/Accept headers,
//! body capped at 2 MiB, 4xx/5xx reported as failure with the status code recorded,
//! redirects followed by the transport, no retries at this layer.

use std::time::{Duration, Instant};

use crate::error::CrawlError;

const USER_AGENT: &str = "hyperweave/0.1 (+https://example.invalid/bot)";
const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// The outcome of one fetch attempt. Never a `Result` at this layer — fetch-layer
/// failures are absorbed into this struct's `success`/`error` fields (spec §7), not
/// propagated as exceptions.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Final URL after any redirects.
    pub url: String,
    pub status: Option<u16>,
    pub body: String,
    pub size: usize,
    pub success: bool,
    pub error: Option<String>,
    pub duration: Duration,
}

pub struct Fetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl Fetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("reqwest client config is static and valid");
        Self { client, max_bytes }
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let start = Instant::now();
        let send_result = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await;

        let mut response = match send_result {
            Ok(resp) => resp,
            Err(e) => {
                let error = if e.is_timeout() {
                    CrawlError::FetchTimeout
                } else {
                    CrawlError::FetchNetwork(e.to_string())
                };
                return FetchOutcome {
                    url: url.to_string(),
                    status: e.status().map(|s| s.as_u16()),
                    body: String::new(),
                    size: 0,
                    success: false,
                    error: Some(error.to_string()),
                    duration: start.elapsed(),
                };
            }
        };

        let final_url = response.url().to_string();
        let status = response.status();

        if !status.is_success() {
            return FetchOutcome {
                url: final_url,
                status: Some(status.as_u16()),
                body: String::new(),
                size: 0,
                success: false,
                error: Some(CrawlError::FetchHttpStatus(status.as_u16()).to_string()),
                duration: start.elapsed(),
            };
        }

        let mut buf: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    buf.extend_from_slice(&chunk);
                    if buf.len() >= self.max_bytes {
                        buf.truncate(self.max_bytes);
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    return FetchOutcome {
                        url: final_url,
                        status: Some(status.as_u16()),
                        body: String::new(),
                        size: 0,
                        success: false,
                        error: Some(CrawlError::FetchNetwork(e.to_string()).to_string()),
                        duration: start.elapsed(),
                    };
                }
            }
        }

        let size = buf.len();
        let body = String::from_utf8_lossy(&buf).into_owned();

        FetchOutcome {
            url: final_url,
            status: Some(status.as_u16()),
            body,
            size,
            success: true,
            error: None,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn successful_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), 2 * 1024 * 1024);
        let outcome = fetcher.fetch(&format!("{}/page", server.uri())).await;

        assert!(outcome.success);
        assert_eq!(outcome.status, Some(200));
        assert_eq!(outcome.body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn http_error_status_is_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), 2 * 1024 * 1024);
        let outcome = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, Some(404));
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn body_is_capped_at_max_bytes() {
        let server = MockServer::start().await;
        let big_body = "a".repeat(100);
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_string(big_body))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), 10);
        let outcome = fetcher.fetch(&format!("{}/big", server.uri())).await;

        assert!(outcome.success);
        assert_eq!(outcome.size, 10);
    }

    #[tokio::test]
    async fn network_error_is_reported_as_failure() {
        let fetcher = Fetcher::new(Duration::from_millis(200), 2 * 1024 * 1024);
        let outcome = fetcher.fetch("http://127.0.0.1:1/unreachable").await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
