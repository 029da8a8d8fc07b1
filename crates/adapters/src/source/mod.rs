// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line source adapters

mod file;

pub use file::FileLineSource;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::VecLineSource;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from line sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("read failed after line {line}: {source}")]
    Read { line: u64, source: std::io::Error },
}

/// Ordered, finite producer of text lines.
///
/// Lines are yielded without their terminator. `Ok(None)` means the source
/// is exhausted and will not produce again.
#[async_trait]
pub trait LineSource: Send + 'static {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    async fn next_line(&mut self) -> Result<Option<String>, SourceError>;
}
