// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Page-view analytics: per-item counts accumulated over one run.

use crate::line_pipeline::{HandlerError, LineHandler, LineOutcome, SkipReason};
use ferry_core::Row;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// First cell of the analytics export header
const HEADER_PATH: &str = "Page path level 1";

/// Which count a report ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Embed,
    Page,
    Total,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Embed, Metric::Page, Metric::Total];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Embed => "embed",
            Metric::Page => "page",
            Metric::Total => "total",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.txt", self.as_str())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for one item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageCounts {
    pub id: String,
    pub page: i64,
    pub embed: i64,
    pub total: i64,
}

impl PageCounts {
    pub fn get(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Embed => self.embed,
            Metric::Page => self.page,
            Metric::Total => self.total,
        }
    }
}

/// Item id of a request path: the first segment, without the leading `/`,
/// cut at the first `.`. Paths not starting with `/` are used whole.
pub(crate) fn item_id(path: &str) -> &str {
    match path.strip_prefix('/') {
        Some(rest) => rest.split('.').next().unwrap_or(rest),
        None => path,
    }
}

/// Embed requests load the item's script: `/<id>.js...`
pub(crate) fn is_embed(path: &str) -> bool {
    path.strip_prefix('/')
        .and_then(|rest| rest.find('.').map(|dot| &rest[dot..]))
        .is_some_and(|tail| tail.starts_with(".js"))
}

/// Accumulates `path\tcount` rows; read the result with [`report`].
///
/// [`report`]: AnalyticsHandler::report
#[derive(Default)]
pub struct AnalyticsHandler {
    counts: Mutex<IndexMap<String, PageCounts>>,
}

impl AnalyticsHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self, path: &str, count: i64) {
        let id = item_id(path);
        let mut counts = self.counts.lock();
        let entry = counts.entry(id.to_string()).or_insert_with(|| PageCounts {
            id: id.to_string(),
            ..PageCounts::default()
        });
        if is_embed(path) {
            entry.embed += count;
        } else {
            entry.page += count;
        }
        entry.total += count;
    }

    /// Snapshot of everything accumulated so far
    pub fn report(&self) -> AnalyticsReport {
        AnalyticsReport {
            items: self.counts.lock().values().cloned().collect(),
        }
    }
}

#[async_trait::async_trait]
impl LineHandler for AnalyticsHandler {
    async fn handle(&self, line: String) -> Result<LineOutcome, HandlerError> {
        let row = Row::new(&line);
        if !row.has_data() {
            return Ok(LineOutcome::Skipped(SkipReason::NoData));
        }
        let path = row.field(0).unwrap_or_default();
        if item_id(path) == HEADER_PATH {
            return Ok(LineOutcome::Skipped(SkipReason::Header));
        }
        let Some(count) = row.int(1) else {
            warn!(line = %line, "count is not a number");
            return Ok(LineOutcome::Skipped(SkipReason::Malformed));
        };

        self.add(path, count);
        Ok(LineOutcome::Accumulated)
    }
}

/// Per-item counts in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub items: Vec<PageCounts>,
}

impl AnalyticsReport {
    /// Items with a non-zero `metric`, highest first; ties keep first-seen order.
    pub fn ranked(&self, metric: Metric) -> Vec<(&str, i64)> {
        let mut ranked: Vec<(&str, i64)> = self
            .items
            .iter()
            .map(|item| (item.id.as_str(), item.get(metric)))
            .filter(|(_, value)| *value != 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Report text: one `id: value` line per ranked item
    pub fn render(&self, metric: Metric) -> String {
        self.ranked(metric)
            .into_iter()
            .map(|(id, value)| format!("{id}: {value}\n"))
            .collect()
    }

    /// Write `embed.txt`, `page.txt` and `total.txt` into `dir`.
    ///
    /// Each report is attempted even if an earlier one fails; the first
    /// error is returned.
    pub async fn write(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;
        let mut written = Vec::new();
        let mut first_error = None;
        for metric in Metric::ALL {
            let path = dir.join(metric.file_name());
            match tokio::fs::write(&path, self.render(metric)).await {
                Ok(()) => {
                    info!(%metric, path = %path.display(), "report written");
                    written.push(path);
                }
                Err(e) => {
                    warn!(%metric, path = %path.display(), error = %e, "error writing report");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
