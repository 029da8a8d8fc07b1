// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ferry content`, `ferry images` and `ferry convert`

use crate::config::{Config, ConvertConfig};
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use ferry_engine::transform::{ContentInfoHandler, ImageInfoHandler};
use ferry_engine::{LineHandler, PipelineConfig, PipelineSummary, SequentialPipeline};
use ferry_storage::RecordStore;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Content export (tab-separated)
    #[arg(long)]
    pub content_input: Option<PathBuf>,
    /// Image export (tab-separated)
    #[arg(long)]
    pub image_input: Option<PathBuf>,
    /// Directory for record documents
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Per-line handler timeout in seconds (0 waits forever)
    #[arg(long)]
    pub handler_timeout_secs: Option<u64>,
}

impl ConvertArgs {
    pub fn apply(self, config: &mut Config) {
        let convert = &mut config.convert;
        if let Some(v) = self.content_input {
            convert.content_input = v;
        }
        if let Some(v) = self.image_input {
            convert.image_input = v;
        }
        if let Some(v) = self.out_dir {
            convert.out_dir = v;
        }
        if let Some(v) = self.handler_timeout_secs {
            convert.handler_timeout_secs = v;
        }
    }
}

/// Which passes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passes {
    Content,
    Images,
    Both,
}

pub async fn handle(passes: Passes, config: &ConvertConfig, format: OutputFormat) -> Result<()> {
    let summaries = run(passes, config).await?;
    output::print(&summaries, format, |s| output::pipeline_text(s))
}

pub async fn run(passes: Passes, config: &ConvertConfig) -> Result<Vec<PipelineSummary>> {
    let store = RecordStore::new(&config.out_dir);
    store
        .ensure_dir()
        .await
        .with_context(|| format!("cannot prepare output directory {}", config.out_dir.display()))?;
    let pipeline_config = PipelineConfig {
        handler_timeout: config.handler_timeout(),
    };

    let mut summaries = Vec::new();
    if matches!(passes, Passes::Content | Passes::Both) {
        let handler = ContentInfoHandler::new(store.clone());
        summaries.push(run_pass(handler, &pipeline_config, &config.content_input).await?);
    }
    if matches!(passes, Passes::Images | Passes::Both) {
        let handler = ImageInfoHandler::new(store);
        summaries.push(run_pass(handler, &pipeline_config, &config.image_input).await?);
    }
    tracing::info!("all done");
    Ok(summaries)
}

async fn run_pass<H: LineHandler>(
    handler: H,
    config: &PipelineConfig,
    input: &Path,
) -> Result<PipelineSummary> {
    let pipeline = SequentialPipeline::with_config(handler, config.clone());
    let summary = pipeline
        .run_file(input)
        .await
        .with_context(|| format!("cannot process {}", input.display()))?;
    Ok(summary)
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
