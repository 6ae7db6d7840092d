use crate::domain::ports::{ConfigProvider, PageSource};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("rec-etl/", env!("CARGO_PKG_VERSION"));

/// Fetches pages over HTTP, retrying transport errors and 5xx responses.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retry_attempts: u32, retry_delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            retry_attempts,
            retry_delay,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_seconds()),
            config.retry_attempts(),
            Duration::from_secs(config.retry_delay_seconds()),
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageSource for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::debug!("Fetched {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Err(e) if attempt < self.retry_attempts && is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Request to {} failed: {} (retry {}/{})",
                        url,
                        e,
                        attempt,
                        self.retry_attempts
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_retryable(error: &EtlError) -> bool {
    match error {
        EtlError::ApiError(_) => true,
        EtlError::HttpStatusError { status, .. } => *status >= 500,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher(retry_attempts: u32) -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5), retry_attempts, Duration::ZERO).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/recreation/hours.php");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<table><tr><td>Monday</td></tr></table>");
        });

        let body = fetcher(0)
            .fetch_page(&server.url("/recreation/hours.php"))
            .await
            .unwrap();

        page.assert();
        assert!(body.contains("Monday"));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let err = fetcher(3)
            .fetch_page(&server.url("/missing"))
            .await
            .unwrap_err();

        page.assert_hits(1);
        assert!(matches!(err, EtlError::HttpStatusError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/flaky");
            then.status(503);
        });

        let err = fetcher(2)
            .fetch_page(&server.url("/flaky"))
            .await
            .unwrap_err();

        page.assert_hits(3);
        assert!(matches!(err, EtlError::HttpStatusError { status: 503, .. }));
    }
}
