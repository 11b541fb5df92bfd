//! HTTP client for gallery pages and image downloads
//!
//! Gallery pages are requested with a browser identity header; image
//! requests go out without custom headers. No retries: a failed request is
//! reported once and the caller moves on.

use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, StatusCode, header::USER_AGENT};
use tracing::{debug, info};

use crate::infrastructure::config::HttpClientConfig;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Thin reqwest wrapper carrying the configured browser identity
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> ScrapeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| ScrapeError::invalid_config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Fetch a gallery page as text; anything but `200 OK` is a [`ScrapeError::PageFetch`]
    pub async fn get_page_html(&self, url: &str) -> ScrapeResult<String> {
        info!("🌐 Fetching gallery page: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::PageFetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;

        debug!("Fetched {} ({} chars)", url, text.len());
        Ok(text)
    }

    /// Download an image body, streaming it into memory
    pub async fn download_bytes(&self, url: &str) -> ScrapeResult<Vec<u8>> {
        debug!("Downloading image: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let capacity = usize::try_from(response.content_length().unwrap_or(0)).unwrap_or(0);
        let mut body = Vec::with_capacity(capacity);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ScrapeError::transport(url, e))?;
            body.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
