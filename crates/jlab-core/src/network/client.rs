//! HTTP client wrapper.
//!
//! Provides a reqwest client with the tool's user agent and timeouts, and
//! maps transport failures and error statuses into [`JlabError`].

use super::download::{ByteSource, ChunkStream};
use crate::config::{AppConfig, NetworkConfig};
use crate::error::{JlabError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client used for asset downloads.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(NetworkConfig::CONNECT_TIMEOUT)
            .user_agent(AppConfig::USER_AGENT)
            .build()
            .map_err(|e| JlabError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self { client })
    }

    /// Make a GET request, failing on non-success statuses.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| JlabError::Network {
                message: format!("GET {} failed: {}", url, e),
                source: Some(e),
            })?;

        Self::check_response_status(response, url)
    }

    /// Check if an HTTP status code indicates a retryable error.
    pub fn is_retryable_status(status: StatusCode) -> bool {
        matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
    }

    fn check_response_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let hint = if Self::is_retryable_status(status) {
            " (temporary, try again later)"
        } else {
            ""
        };

        Err(JlabError::DownloadFailed {
            url: url.to_string(),
            message: format!("server responded with status {}{}", status, hint),
        })
    }
}

#[async_trait]
impl ByteSource for HttpClient {
    async fn open(&self, url: &str) -> Result<ChunkStream> {
        let response = self.get(url).await?;
        let url = url.to_string();

        let chunks = response.bytes_stream().map(move |chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| JlabError::Network {
                    message: format!("Error reading download stream from {}: {}", url, e),
                    source: Some(e),
                })
        });
        Ok(chunks.boxed())
    }
}
