// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line source backed by a UTF-8 text file.

use super::{LineSource, SourceError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Reads a file line by line; `\n` and `\r\n` terminators are stripped.
pub struct FileLineSource {
    name: String,
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    read: u64,
}

impl FileLineSource {
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).await.map_err(|source| SourceError::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self {
            name: path.display().to_string(),
            path: path.to_owned(),
            lines: BufReader::new(file).lines(),
            read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LineSource for FileLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        let line = self
            .lines
            .next_line()
            .await
            .map_err(|source| SourceError::Read {
                line: self.read,
                source,
            })?;
        if line.is_some() {
            self.read += 1;
        }
        Ok(line)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
