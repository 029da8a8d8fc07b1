// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake remote store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ByteStream, RemoteStore, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Recorded put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCall {
    pub key: String,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct FakeStoreState {
    calls: Vec<PutCall>,
    failures: HashMap<String, String>,
    hangs: HashSet<String>,
    delay: Option<Duration>,
    in_flight: usize,
    peak_in_flight: usize,
}

/// Fake store that records puts and injects failures.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

/// Decrements the in-flight count even when the put future is dropped.
struct InFlight {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.inner.lock().in_flight -= 1;
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make puts for `key` fail with `message`
    pub fn fail(&self, key: &str, message: &str) {
        self.inner
            .lock()
            .failures
            .insert(key.to_string(), message.to_string());
    }

    /// Make puts for `key` never complete
    pub fn hang(&self, key: &str) {
        self.inner.lock().hangs.insert(key.to_string());
    }

    /// Hold every put for `delay` before reporting
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = Some(delay);
    }

    /// All attempted puts, in the order they started
    pub fn calls(&self) -> Vec<PutCall> {
        self.inner.lock().calls.clone()
    }

    /// Keys of all attempted puts
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().calls.iter().map(|c| c.key.clone()).collect()
    }

    /// Highest number of puts observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.inner.lock().peak_in_flight
    }

    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn put(&self, key: &str, mut body: ByteStream, _len: u64) -> Result<(), StoreError> {
        let (failure, hang, delay) = {
            let mut state = self.inner.lock();
            state.in_flight += 1;
            state.peak_in_flight = state.peak_in_flight.max(state.in_flight);
            (
                state.failures.get(key).cloned(),
                state.hangs.contains(key),
                state.delay,
            )
        };
        let _guard = InFlight {
            inner: Arc::clone(&self.inner),
        };

        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes).await?;
        self.inner.lock().calls.push(PutCall {
            key: key.to_string(),
            body: bytes,
        });

        if hang {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match failure {
            Some(message) => Err(StoreError::Other(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
