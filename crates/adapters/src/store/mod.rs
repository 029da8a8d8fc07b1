// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote object store adapters

mod dir;
mod http;

pub use dir::DirStore;
pub use http::HttpStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, PutCall};

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Readable body of one upload
pub type ByteStream = Pin<Box<dyn AsyncRead + Send + Sync>>;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("store rejected upload with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("{0}")]
    Other(String),
}

/// Destination for uploads.
///
/// A put reports exactly one of success or failure. Putting the same key
/// twice overwrites the stored object, so retries and resumed runs are safe.
#[async_trait]
pub trait RemoteStore: Clone + Send + Sync + 'static {
    /// Store `body` (of `len` bytes) under `key`
    async fn put(&self, key: &str, body: ByteStream, len: u64) -> Result<(), StoreError>;
}

/// Keys are relative, `/`-separated and free of `.`/`..` segments.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
