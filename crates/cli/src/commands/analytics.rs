// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ferry analytics`

use crate::config::{AnalyticsConfig, Config};
use crate::output::{self, AnalyticsOutput, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use ferry_engine::transform::AnalyticsHandler;
use ferry_engine::SequentialPipeline;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct AnalyticsArgs {
    /// Analytics export (`path<TAB>count` rows)
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Directory for embed.txt, page.txt and total.txt
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl AnalyticsArgs {
    pub fn apply(self, config: &mut Config) {
        if let Some(v) = self.input {
            config.analytics.input = v;
        }
        if let Some(v) = self.out_dir {
            config.analytics.out_dir = v;
        }
    }
}

pub async fn handle(config: &AnalyticsConfig, format: OutputFormat) -> Result<()> {
    let out = run(config).await?;
    output::print(&out, format, output::analytics_text)
}

pub async fn run(config: &AnalyticsConfig) -> Result<AnalyticsOutput> {
    // Counts accumulate in the handler, so it lives only for this run
    let pipeline = SequentialPipeline::new(AnalyticsHandler::new());
    let summary = pipeline
        .run_file(&config.input)
        .await
        .with_context(|| format!("cannot process {}", config.input.display()))?;

    let report = pipeline.handler().report();
    let reports = report
        .write(&config.out_dir)
        .await
        .with_context(|| format!("cannot write reports to {}", config.out_dir.display()))?;

    Ok(AnalyticsOutput {
        summary,
        items: report.items.len(),
        reports,
    })
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
