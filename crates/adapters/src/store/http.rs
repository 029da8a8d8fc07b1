// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP object store: one streaming `PUT <base_url>/<key>` per upload.
//!
//! Works against any store that accepts plain PUTs (pre-authorized bucket
//! endpoints, WebDAV, simple object gateways). A bearer token is sent when
//! configured.

use super::{validate_key, ByteStream, RemoteStore, StoreError};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Url};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// Longest response body kept in a rejection diagnostic
const MAX_ERROR_BODY: usize = 200;

#[derive(Clone, Debug)]
pub struct HttpStore {
    client: Client,
    base: Arc<Url>,
    token: Option<Arc<str>>,
}

impl HttpStore {
    /// Create a store rooted at `base_url`.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, StoreError> {
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base = Url::parse(&normalized)
            .map_err(|e| StoreError::Other(format!("invalid base url {base_url:?}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::Other(format!(
                "unsupported url scheme {:?}",
                base.scheme()
            )));
        }

        let client = Client::builder()
            .connect_timeout(crate::env::http_connect_timeout())
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base: Arc::new(base),
            token: token.map(Arc::from),
        })
    }

    /// Object URL for `key`; each segment is percent-encoded, so `#`, `?`
    /// and `%` stay part of the object name.
    pub fn url_for(&self, key: &str) -> Result<Url, StoreError> {
        validate_key(key)?;
        let mut url = Url::clone(&self.base);
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidKey(key.to_string()))?
            .pop_if_empty()
            .extend(key.split('/'));
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn put(&self, key: &str, body: ByteStream, len: u64) -> Result<(), StoreError> {
        let url = self.url_for(key)?;

        let mut request = self
            .client
            .put(url)
            .header(CONTENT_LENGTH, len)
            .header(CONTENT_TYPE, content_type_for(key))
            .body(Body::wrap_stream(ReaderStream::new(body)));
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body: truncate(&text, MAX_ERROR_BODY),
        })
    }
}

fn content_type_for(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("json") => "application/json",
        Some("txt") | Some("tsv") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
