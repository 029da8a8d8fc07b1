// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-record JSON documents.
//!
//! Each record lives at `<dir>/<case-safe id>.json`. Saves write a `.tmp`
//! sibling and rename it into place so a crash never leaves a half-written
//! document behind.

use ferry_core::RecordId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("corrupt record {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot serialize record {id}: {source}")]
    Serialize {
        id: RecordId,
        source: serde_json::Error,
    },
}

/// Directory of JSON record documents
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), RecordError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| RecordError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    pub fn path_for(&self, id: &RecordId) -> PathBuf {
        self.dir.join(format!("{}.json", id.case_safe_stem()))
    }

    pub async fn exists(&self, id: &RecordId) -> Result<bool, RecordError> {
        let path = self.path_for(id);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|source| RecordError::Io { path, source })
    }

    /// Load a record; `Ok(None)` when the document does not exist.
    pub async fn load<T: DeserializeOwned>(&self, id: &RecordId) -> Result<Option<T>, RecordError> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(RecordError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| RecordError::Corrupt { path, source })
    }

    /// Write a record as 2-space indented JSON, replacing any existing one.
    pub async fn save<T: Serialize>(&self, id: &RecordId, record: &T) -> Result<(), RecordError> {
        let json = serde_json::to_vec_pretty(record).map_err(|source| RecordError::Serialize {
            id: id.clone(),
            source,
        })?;

        let path = self.path_for(id);
        let tmp_path = path.with_extension("json.tmp");
        let io_err = |source: io::Error| RecordError::Io {
            path: tmp_path.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&tmp_path).await.map_err(io_err)?;
        file.write_all(&json).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| RecordError::Io { path, source })
    }
}

#[cfg(test)]
#[path = "record_store_tests.rs"]
mod tests;
