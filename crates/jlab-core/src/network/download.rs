//! File downloads.
//!
//! Downloads stream into `<destination>.part` and are renamed into place
//! once complete, so an interrupted download never leaves a truncated file
//! under the final name.

use crate::config::NetworkConfig;
use crate::error::{JlabError, Result};
use crate::network::client::HttpClient;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Body of a response, chunk by chunk.
pub type ChunkStream = BoxStream<'static, Result<Vec<u8>>>;

/// Where downloaded bytes come from.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Start fetching `url`. Errors before the first byte (connection,
    /// error status) are returned here, later ones through the stream.
    async fn open(&self, url: &str) -> Result<ChunkStream>;
}

/// Downloads files into place.
#[derive(Clone)]
pub struct Downloader {
    source: Arc<dyn ByteSource>,
    temp_suffix: String,
}

impl Downloader {
    /// Create a downloader with a default HTTP client.
    pub fn new() -> Result<Self> {
        Ok(Self::with_source(Arc::new(HttpClient::new()?)))
    }

    /// Create a downloader reading from `source`.
    pub fn with_source(source: Arc<dyn ByteSource>) -> Self {
        Self {
            source,
            temp_suffix: NetworkConfig::DOWNLOAD_TEMP_SUFFIX.to_string(),
        }
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| JlabError::io_context("create download directory", parent, e))?;
        }

        let temp_path = self.temp_path(destination);

        match self.download_to(url, &temp_path).await {
            Ok(bytes) => {
                tokio::fs::rename(&temp_path, destination)
                    .await
                    .map_err(|e| {
                        let _ = std::fs::remove_file(&temp_path);
                        JlabError::io_context(
                            "move download to final destination",
                            destination,
                            e,
                        )
                    })?;

                info!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(bytes)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                Err(e)
            }
        }
    }

    fn temp_path(&self, destination: &Path) -> PathBuf {
        let mut name = destination.as_os_str().to_os_string();
        name.push(&self.temp_suffix);
        PathBuf::from(name)
    }

    async fn download_to(&self, url: &str, temp_path: &Path) -> Result<u64> {
        let mut stream = self.source.open(url).await?;

        let mut file = tokio::fs::File::create(temp_path)
            .await
            .map_err(|e| JlabError::io_context("create temp file", temp_path, e))?;

        let mut bytes_downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| JlabError::io_context("write temp file", temp_path, e))?;
            bytes_downloaded += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| JlabError::io_context("flush temp file", temp_path, e))?;

        debug!("Streamed {} bytes from {}", bytes_downloaded, url);
        Ok(bytes_downloaded)
    }
}

/// File extension (with the leading dot) of the last path segment of a URL.
pub fn url_file_extension(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let file_name = parsed.path_segments()?.last()?;
    let extension = Path::new(file_name).extension()?;
    Some(format!(".{}", extension.to_string_lossy()))
}
