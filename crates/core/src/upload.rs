// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upload job lifecycle.

use crate::id::FileId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of a single upload within a run.
///
/// Jobs move `Pending -> InFlight -> Succeeded | Failed` and are never
/// retried within the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UploadStatus::Pending => "pending",
            UploadStatus::InFlight => "in-flight",
            UploadStatus::Succeeded => "succeeded",
            UploadStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("upload {file}: cannot move from {from} to {to}")]
pub struct TransitionError {
    pub file: FileId,
    pub from: UploadStatus,
    pub to: UploadStatus,
}

/// One candidate file and where it is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadJob {
    pub file: FileId,
    pub status: UploadStatus,
    /// Failure diagnostic, set on the `Failed` transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadJob {
    pub fn new(file: impl Into<FileId>) -> Self {
        Self {
            file: file.into(),
            status: UploadStatus::Pending,
            error: None,
        }
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(UploadStatus::Pending, UploadStatus::InFlight)
    }

    pub fn succeed(&mut self) -> Result<(), TransitionError> {
        self.transition(UploadStatus::InFlight, UploadStatus::Succeeded)
    }

    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(UploadStatus::InFlight, UploadStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn transition(&mut self, from: UploadStatus, to: UploadStatus) -> Result<(), TransitionError> {
        if self.status != from {
            return Err(TransitionError {
                file: self.file.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
