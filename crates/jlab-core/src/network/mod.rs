//! Network utilities for HTTP operations.
//!
//! This module provides:
//! - HTTP client with timeouts and status checking
//! - Downloader writing through a temporary `.part` file, reading from any
//!   [`ByteSource`]

mod client;
mod download;

pub use client::HttpClient;
pub use download::{url_file_extension, ByteSource, ChunkStream, Downloader};
