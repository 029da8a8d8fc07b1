// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ferry upload`

use crate::config::{Config, StoreConfig, UploadSection};
use crate::output::{self, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::Args;
use ferry_adapters::{DirStore, HttpStore, RemoteStore, TracedStore};
use ferry_engine::{UploadEngine, UploadSummary};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Directory whose files are uploaded
    #[arg(long)]
    pub source_dir: Option<PathBuf>,
    /// Only upload files whose names end with this
    #[arg(long)]
    pub suffix: Option<String>,
    /// Maximum uploads in flight
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
    /// Per-file timeout in seconds (0 waits forever)
    #[arg(long)]
    pub job_timeout_secs: Option<u64>,
    /// Log of finished uploads, read on start to resume
    #[arg(long)]
    pub done_log: Option<PathBuf>,
    /// Log of failed uploads
    #[arg(long)]
    pub error_log: Option<PathBuf>,
    /// Prefix for remote keys
    #[arg(long)]
    pub key_prefix: Option<String>,
    /// Upload with HTTP PUT to this base URL
    #[arg(long, conflicts_with = "store_dir")]
    pub store_url: Option<String>,
    /// Copy files into this directory instead
    #[arg(long)]
    pub store_dir: Option<PathBuf>,
}

impl UploadArgs {
    pub fn apply(self, config: &mut Config) {
        let upload = &mut config.upload;
        if let Some(v) = self.source_dir {
            upload.source_dir = v;
        }
        if let Some(v) = self.suffix {
            upload.suffix = v;
        }
        if let Some(v) = self.concurrency {
            upload.concurrency = v;
        }
        if let Some(v) = self.job_timeout_secs {
            upload.job_timeout_secs = v;
        }
        if let Some(v) = self.done_log {
            upload.done_log = v;
        }
        if let Some(v) = self.error_log {
            upload.error_log = v;
        }
        if let Some(v) = self.key_prefix {
            upload.key_prefix = v;
        }
        if let Some(v) = self.store_url {
            config.store.set_url(v);
        }
        if let Some(v) = self.store_dir {
            config.store.set_dir(v);
        }
    }
}

pub async fn handle(upload: &UploadSection, store: &StoreConfig, format: OutputFormat) -> Result<()> {
    let summary = match (&store.url, &store.dir) {
        (Some(url), _) => {
            let http = HttpStore::new(url, store.token.clone())
                .with_context(|| format!("cannot use store url {url}"))?;
            run(TracedStore::new(http), upload).await?
        }
        (None, Some(dir)) => run(TracedStore::new(DirStore::new(dir)), upload).await?,
        (None, None) => bail!("no upload destination: set store.url or store.dir (or --store-url / --store-dir)"),
    };
    output::print(&summary, format, output::upload_text)
}

pub async fn run<S: RemoteStore>(store: S, upload: &UploadSection) -> Result<UploadSummary> {
    let engine = UploadEngine::new(store, upload.to_engine_config());
    let summary = engine
        .run()
        .await
        .with_context(|| format!("cannot upload {}", upload.source_dir.display()))?;
    Ok(summary)
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
