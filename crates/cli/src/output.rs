// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use ferry_core::format_duration;
use ferry_engine::{PipelineSummary, UploadSummary};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a value as pretty JSON, or as the text produced by `text`.
pub fn print<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", text(value)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn elapsed(ms: u64) -> String {
    format_duration(Duration::from_millis(ms))
}

/// One line per pipeline run
pub fn pipeline_text(summaries: &[PipelineSummary]) -> String {
    let mut out = String::new();
    for s in summaries {
        let mut line = format!(
            "{}: {} lines, {} written, {} updated, {} skipped, {} failed",
            s.source, s.lines, s.written, s.updated, s.skipped, s.failed
        );
        if s.accumulated > 0 {
            line.push_str(&format!(", {} counted", s.accumulated));
        }
        if s.timed_out > 0 {
            line.push_str(&format!(" ({} timed out)", s.timed_out));
        }
        line.push_str(&format!(" in {}\n", elapsed(s.elapsed_ms)));
        out.push_str(&line);
        if let Some(error) = &s.source_error {
            out.push_str(&format!("  source stopped early: {}\n", error));
        }
    }
    out
}

pub fn upload_text(s: &UploadSummary) -> String {
    let mut out = format!(
        "uploaded {}, failed {}, already done {}, skipped {} (peak {} in flight) in {}\n",
        s.uploaded,
        s.failed,
        s.already_done,
        s.skipped,
        s.peak_in_flight,
        elapsed(s.elapsed_ms)
    );
    for failure in &s.failures {
        out.push_str(&format!("  {}: {}\n", failure.file, failure.error));
    }
    out
}

/// Analytics run plus the report files it wrote
#[derive(Debug, Serialize)]
pub struct AnalyticsOutput {
    #[serde(flatten)]
    pub summary: PipelineSummary,
    pub items: usize,
    pub reports: Vec<PathBuf>,
}

pub fn analytics_text(out: &AnalyticsOutput) -> String {
    let mut text = pipeline_text(std::slice::from_ref(&out.summary));
    text.push_str(&format!("{} items\n", out.items));
    for path in &out.reports {
        text.push_str(&format!("  wrote {}\n", path.display()));
    }
    text
}
