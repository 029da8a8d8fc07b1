// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only log of per-file failures.
//!
//! Format: `<identifier>: <diagnostic message>`, one failure per line.

use crate::append::{self, single_line, AppendFile};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErrorLogError {
    #[error("cannot open error log {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot append to error log {path}: {source}")]
    Append { path: PathBuf, source: io::Error },
    #[error("cannot read error log {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// A parsed error log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub id: String,
    pub message: String,
}

pub struct ErrorLog {
    file: AppendFile,
}

impl ErrorLog {
    pub fn open(path: &Path) -> Result<Self, ErrorLogError> {
        let file = AppendFile::open(path).map_err(|source| ErrorLogError::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self { file })
    }

    /// Append one failure. Multi-line messages are collapsed onto one line.
    pub fn append(&mut self, id: &str, message: &str) -> Result<(), ErrorLogError> {
        let line = format!("{}: {}", single_line(id), single_line(message));
        self.file
            .append_line(&line)
            .map_err(|source| ErrorLogError::Append {
                path: self.file.path().to_owned(),
                source,
            })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read back all entries; a missing log has none.
    pub fn entries(path: &Path) -> Result<Vec<ErrorEntry>, ErrorLogError> {
        let lines = append::read_lines(path).map_err(|source| ErrorLogError::Read {
            path: path.to_owned(),
            source,
        })?;
        Ok(lines
            .into_iter()
            .map(|line| match line.split_once(": ") {
                Some((id, message)) => ErrorEntry {
                    id: id.to_string(),
                    message: message.to_string(),
                },
                None => ErrorEntry {
                    id: line,
                    message: String::new(),
                },
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "error_log_tests.rs"]
mod tests;
