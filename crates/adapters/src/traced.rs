// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::source::{LineSource, SourceError};
use crate::store::{ByteStream, RemoteStore, StoreError};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any RemoteStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: RemoteStore> RemoteStore for TracedStore<S> {
    async fn put(&self, key: &str, body: ByteStream, len: u64) -> Result<(), StoreError> {
        async {
            tracing::debug!(len, "uploading");
            let start = std::time::Instant::now();
            let result = self.inner.put(key, body, len).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "uploaded"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "upload failed"),
            }
            result
        }
        .instrument(tracing::info_span!("store.put", key))
        .await
    }
}

/// Wrapper that counts and traces lines read from any LineSource
pub struct TracedSource<L> {
    inner: L,
    lines: u64,
}

impl<L> TracedSource<L> {
    pub fn new(inner: L) -> Self {
        Self { inner, lines: 0 }
    }
}

#[async_trait]
impl<L: LineSource> LineSource for TracedSource<L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        let result = self.inner.next_line().await;
        match &result {
            Ok(Some(line)) => {
                self.lines += 1;
                tracing::trace!(source = self.inner.name(), n = self.lines, len = line.len(), "line read");
            }
            Ok(None) => {
                tracing::debug!(source = self.inner.name(), lines = self.lines, "source exhausted")
            }
            Err(e) => tracing::error!(source = self.inner.name(), error = %e, "read failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
