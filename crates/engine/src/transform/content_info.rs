// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content export rows to new record documents.

use super::record_id;
use crate::line_pipeline::{HandlerError, LineHandler, LineOutcome, SkipReason};
use ferry_core::{RecordId, Row};
use ferry_storage::RecordStore;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Column positions in the content export
mod column {
    pub const ATTRIBUTION_LINK: usize = 4;
    pub const ATTRIBUTION_TEXT: usize = 5;
    pub const ID: usize = 8;
    pub const MIME: usize = 9;
    pub const SIZE: usize = 12;
    pub const TITLE: usize = 14;
    pub const URL: usize = 16;
}

/// Record document as first written from the content export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// `null` when the column is not numeric
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub progress: u32,
}

impl ContentRecord {
    pub fn from_row(id: RecordId, row: &Row<'_>) -> Self {
        let text = |index| row.non_empty(index).map(str::to_string);
        Self {
            id,
            attribution_link: text(column::ATTRIBUTION_LINK),
            attribution_text: text(column::ATTRIBUTION_TEXT),
            // Present-but-empty values are kept for these two
            mime: row.field(column::MIME).map(str::to_string),
            size: row.int(column::SIZE),
            title: text(column::TITLE),
            url: row.field(column::URL).map(str::to_string),
            ready: false,
            failed: false,
            progress: 0,
        }
    }
}

/// Writes one record per content row; existing records are left alone.
pub struct ContentInfoHandler {
    store: RecordStore,
}

impl ContentInfoHandler {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl LineHandler for ContentInfoHandler {
    async fn handle(&self, line: String) -> Result<LineOutcome, HandlerError> {
        let row = Row::new(&line);
        let id = match record_id(&row, column::ID) {
            Ok(id) => id,
            Err(reason) => return Ok(LineOutcome::Skipped(reason)),
        };

        if self.store.exists(&id).await? {
            info!(%id, "skipping, already exists");
            return Ok(LineOutcome::Skipped(SkipReason::AlreadyExists));
        }

        let record = ContentRecord::from_row(id.clone(), &row);
        self.store.save(&id, &record).await?;
        info!(%id, "content success");
        Ok(LineOutcome::Written(id))
    }
}

#[cfg(test)]
#[path = "content_info_tests.rs"]
mod tests;
