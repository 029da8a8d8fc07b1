// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image export rows merged into existing record documents.

use super::record_id;
use crate::line_pipeline::{HandlerError, LineHandler, LineOutcome, SkipReason};
use ferry_core::Row;
use ferry_storage::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

mod column {
    pub const HEIGHT: usize = 3;
    pub const ID: usize = 4;
    pub const TILE_FORMAT: usize = 5;
    pub const TILE_OVERLAP: usize = 6;
    pub const TILE_SIZE: usize = 7;
    pub const WIDTH: usize = 9;
}

/// Deep-zoom tiling parameters attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DziInfo {
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_format: Option<String>,
    pub tile_overlap: Option<i64>,
    pub tile_size: Option<i64>,
    pub width: Option<i64>,
}

impl DziInfo {
    pub fn from_row(row: &Row<'_>) -> Self {
        Self {
            height: row.int(column::HEIGHT),
            tile_format: row.field(column::TILE_FORMAT).map(str::to_string),
            tile_overlap: row.int(column::TILE_OVERLAP),
            tile_size: row.int(column::TILE_SIZE),
            width: row.int(column::WIDTH),
        }
    }
}

/// Sets `dzi` on records the content pass already wrote.
///
/// Rows without a record are skipped quietly. Every other key of the
/// document is kept as-is, in its original order.
pub struct ImageInfoHandler {
    store: RecordStore,
}

impl ImageInfoHandler {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl LineHandler for ImageInfoHandler {
    async fn handle(&self, line: String) -> Result<LineOutcome, HandlerError> {
        let row = Row::new(&line);
        let id = match record_id(&row, column::ID) {
            Ok(id) => id,
            Err(reason) => return Ok(LineOutcome::Skipped(reason)),
        };

        let Some(document) = self.store.load::<Value>(&id).await? else {
            debug!(%id, "no record to update");
            return Ok(LineOutcome::Skipped(SkipReason::NoRecord));
        };
        let Value::Object(mut record) = document else {
            warn!(%id, "record is not a JSON object");
            return Ok(LineOutcome::Skipped(SkipReason::Malformed));
        };

        set_dzi(&mut record, DziInfo::from_row(&row));
        self.store.save(&id, &record).await?;
        info!(%id, "image success");
        Ok(LineOutcome::Updated(id))
    }
}

fn set_dzi(record: &mut Map<String, Value>, dzi: DziInfo) {
    // DziInfo has only plain fields, so this cannot fail
    let value = serde_json::to_value(dzi).unwrap_or(Value::Null);
    record.insert("dzi".to_string(), value);
}

#[cfg(test)]
#[path = "image_info_tests.rs"]
mod tests;
