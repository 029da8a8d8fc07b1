// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store that mirrors objects into a local directory.
//!
//! Useful for staging a bucket locally or for dry runs. Objects are written
//! to a `.part` sibling and renamed into place, so a re-upload replaces the
//! previous object atomically.

use super::{validate_key, ByteStream, RemoteStore, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

#[derive(Clone, Debug)]
pub struct DirStore {
    root: Arc<PathBuf>,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl RemoteStore for DirStore {
    async fn put(&self, key: &str, mut body: ByteStream, len: u64) -> Result<(), StoreError> {
        validate_key(key)?;

        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let part = path.with_file_name(format!(
            "{}.part",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        ));
        let mut file = tokio::fs::File::create(&part).await?;
        let written = tokio::io::copy(&mut body, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if written != len {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(StoreError::Other(format!(
                "short body: expected {} bytes, read {}",
                len, written
            )));
        }

        tokio::fs::rename(&part, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "dir_tests.rs"]
mod tests;
