// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line handlers that turn export rows into record documents and reports

mod analytics;
mod content_info;
mod image_info;

pub use analytics::{AnalyticsHandler, AnalyticsReport, Metric, PageCounts};
pub use content_info::{ContentInfoHandler, ContentRecord};
pub use image_info::{DziInfo, ImageInfoHandler};

use crate::line_pipeline::SkipReason;
use ferry_core::{RecordId, Row};
use tracing::warn;

/// Identifier every export repeats in its header row
const HEADER_ID: &str = "Id";

/// Pull the record id out of `column`, applying the shared row rules.
fn record_id(row: &Row<'_>, column: usize) -> Result<RecordId, SkipReason> {
    if !row.has_data() {
        return Err(SkipReason::NoData);
    }
    let Some(id) = row.non_empty(column) else {
        warn!(line = row.line(), "bad ID");
        return Err(SkipReason::BadId);
    };
    if id == HEADER_ID {
        return Err(SkipReason::Header);
    }
    Ok(RecordId::new(id))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
