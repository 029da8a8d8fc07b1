// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resume log of completed uploads.
//!
//! One identifier per line, newline-terminated, append-only. The whole log
//! is read once at startup into a [`DoneSet`]; duplicate entries collapse
//! on load. A crash loses at most the uploads that had not been appended
//! yet, and those are simply uploaded again on the next run.

use crate::append::{self, AppendFile};
use ferry_core::FileId;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in done log operations
#[derive(Debug, Error)]
pub enum DoneLogError {
    #[error("cannot read done log {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot open done log {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot append to done log {path}: {source}")]
    Append { path: PathBuf, source: io::Error },
    #[error("identifier {0:?} cannot be stored in the done log")]
    InvalidId(String),
}

/// Identifiers already uploaded, as of the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoneSet {
    ids: HashSet<FileId>,
}

impl DoneSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileId> {
        self.ids.iter()
    }
}

impl FromIterator<FileId> for DoneSet {
    fn from_iter<I: IntoIterator<Item = FileId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Append handle on the done log
pub struct DoneLog {
    file: AppendFile,
}

impl DoneLog {
    /// Load the persisted done set, then open the log for appending.
    ///
    /// A missing or empty log yields an empty set.
    pub fn open(path: &Path) -> Result<(Self, DoneSet), DoneLogError> {
        let done = Self::load(path)?;
        let file = AppendFile::open(path).map_err(|source| DoneLogError::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok((Self { file }, done))
    }

    /// Read the done set without opening the log for writing.
    pub fn load(path: &Path) -> Result<DoneSet, DoneLogError> {
        let lines = append::read_lines(path).map_err(|source| DoneLogError::Read {
            path: path.to_owned(),
            source,
        })?;
        Ok(lines.into_iter().map(FileId::from).collect())
    }

    /// Whether `id` survives a write and reload unchanged.
    ///
    /// Lines are trimmed on load, so padded names could never be found.
    pub fn can_record(id: &str) -> bool {
        !id.is_empty() && !id.contains(['\n', '\r']) && id.trim() == id
    }

    /// Record one successful upload.
    pub fn append(&mut self, id: &FileId) -> Result<(), DoneLogError> {
        let value = id.as_str();
        if !Self::can_record(value) {
            return Err(DoneLogError::InvalidId(value.to_string()));
        }
        self.file
            .append_line(value)
            .map_err(|source| DoneLogError::Append {
                path: self.file.path().to_owned(),
                source,
            })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
#[path = "done_log_tests.rs"]
mod tests;
