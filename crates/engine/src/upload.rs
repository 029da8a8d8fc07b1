// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resumable bounded-concurrency upload of a directory of files.
//!
//! A fixed pool of `concurrency` workers pulls file names from a bounded
//! channel. Finished files are appended to the done log, which is read once
//! at startup so a rerun skips everything already uploaded. Per-file
//! failures go to the error log and never stop the run.

use ferry_adapters::{ByteStream, RemoteStore};
use ferry_core::{format_duration, ConcurrencyBudget, FileId, UploadJob, DEFAULT_CONCURRENCY};
use ferry_storage::{DoneLog, DoneLogError, DoneSet, ErrorLog, ErrorLogError};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Default per-file upload timeout
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(300);

/// Default file name suffix for upload candidates
pub const DEFAULT_SUFFIX: &str = ".json";

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub source_dir: PathBuf,
    /// Only names ending with this are uploaded; others are error-logged
    pub suffix: String,
    /// Upper bound on uploads in flight at once
    pub concurrency: usize,
    /// Upper bound on a single upload; `None` waits forever
    pub job_timeout: Option<Duration>,
    pub done_log: PathBuf,
    pub error_log: PathBuf,
    /// Prepended to the file name to form the remote key
    pub key_prefix: String,
}

impl UploadConfig {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        done_log: impl Into<PathBuf>,
        error_log: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            job_timeout: Some(DEFAULT_JOB_TIMEOUT),
            done_log: done_log.into(),
            error_log: error_log.into(),
            key_prefix: String::new(),
        }
    }

    fn key_for(&self, file: &FileId) -> String {
        format!("{}{}", self.key_prefix, file)
    }
}

/// Errors that stop a run before any upload starts
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error(transparent)]
    DoneLog(#[from] DoneLogError),
    #[error(transparent)]
    ErrorLog(#[from] ErrorLogError),
    #[error("cannot list {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One failed upload, as written to the error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpload {
    pub file: FileId,
    pub error: String,
}

/// Counts for one upload run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Regular files found in the source directory
    pub files: usize,
    /// Names not matching the suffix or not recordable in the done log
    pub skipped: usize,
    /// Already in the done log at startup
    pub already_done: usize,
    pub uploaded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub peak_in_flight: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedUpload>,
}

impl UploadSummary {
    pub fn attempted(&self) -> usize {
        self.uploaded + self.failed
    }

    fn merge(&mut self, tally: WorkerTally) {
        self.uploaded += tally.uploaded;
        self.failed += tally.failures.len();
        self.timed_out += tally.timed_out;
        self.failures.extend(tally.failures);
    }
}

/// Per-worker counts, merged into the summary when the worker exits
#[derive(Default)]
struct WorkerTally {
    uploaded: usize,
    timed_out: usize,
    failures: Vec<FailedUpload>,
}

/// Why one upload failed
#[derive(Debug, Error)]
enum JobFailure {
    #[error("cannot open: {0}")]
    Open(std::io::Error),
    #[error("{0}")]
    Store(#[from] ferry_adapters::StoreError),
    #[error("timed out after {}", shown(.0))]
    TimedOut(Duration),
}

fn shown(limit: &Duration) -> String {
    format_duration(*limit)
}

/// Append handles shared by all workers.
///
/// Each log sits behind its own mutex so a line is always written whole.
struct RunLogs {
    done: Mutex<DoneLog>,
    errors: Mutex<ErrorLog>,
}

impl RunLogs {
    fn record_success(&self, file: &FileId) {
        if let Err(e) = self.done.lock().append(file) {
            // The upload itself succeeded; the next run re-uploads it.
            error!(%file, error = %e, "failed to record upload in done log");
        }
    }

    fn record_failure(&self, file: &str, message: &str) {
        if let Err(e) = self.errors.lock().append(file, message) {
            error!(file, error = %e, message, "failed to write error log");
        }
    }
}

struct Worker<S> {
    id: usize,
    store: S,
    config: Arc<UploadConfig>,
    budget: ConcurrencyBudget,
    logs: Arc<RunLogs>,
    jobs: Arc<tokio::sync::Mutex<mpsc::Receiver<FileId>>>,
}

impl<S: RemoteStore> Worker<S> {
    async fn run(self) -> WorkerTally {
        let mut tally = WorkerTally::default();
        loop {
            // Hold the receiver lock only while waiting for the next job
            let next = self.jobs.lock().await.recv().await;
            let Some(file) = next else {
                debug!(worker = self.id, "no more jobs");
                return tally;
            };
            self.process(file, &mut tally).await;
        }
    }

    async fn process(&self, file: FileId, tally: &mut WorkerTally) {
        let mut job = UploadJob::new(file);
        // The pool never has more workers than the cap, so a permit is
        // always free here; it tracks in-flight uploads and the peak.
        let permit = self.budget.try_acquire();
        if let Err(e) = job.start() {
            error!(error = %e, "upload job out of order");
            return;
        }
        let result = self.upload_with_timeout(&job.file).await;
        drop(permit);

        match result {
            Ok(()) => {
                if job.succeed().is_ok() {
                    info!(file = %job.file, "uploaded");
                    self.logs.record_success(&job.file);
                    tally.uploaded += 1;
                }
            }
            Err(failure) => {
                let message = failure.to_string();
                warn!(file = %job.file, error = %message, "upload failed");
                if matches!(failure, JobFailure::TimedOut(_)) {
                    tally.timed_out += 1;
                }
                self.logs.record_failure(job.file.as_str(), &message);
                let _ = job.fail(message.clone());
                tally.failures.push(FailedUpload {
                    file: job.file,
                    error: message,
                });
            }
        }
    }

    async fn upload_with_timeout(&self, file: &FileId) -> Result<(), JobFailure> {
        match self.config.job_timeout {
            Some(limit) => tokio::time::timeout(limit, self.upload(file))
                .await
                .unwrap_or(Err(JobFailure::TimedOut(limit))),
            None => self.upload(file).await,
        }
    }

    async fn upload(&self, file: &FileId) -> Result<(), JobFailure> {
        let path = self.config.source_dir.join(file.as_str());
        let handle = tokio::fs::File::open(&path).await.map_err(JobFailure::Open)?;
        let len = handle.metadata().await.map_err(JobFailure::Open)?.len();
        let body: ByteStream = Box::pin(handle);
        self.store
            .put(&self.config.key_for(file), body, len)
            .await?;
        Ok(())
    }
}

/// Uploads every eligible file in a directory to a [`RemoteStore`].
pub struct UploadEngine<S> {
    store: S,
    config: Arc<UploadConfig>,
}

impl<S: RemoteStore> UploadEngine<S> {
    pub fn new(store: S, config: UploadConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Run to completion: every candidate is attempted once and every
    /// worker has finished.
    pub async fn run(&self) -> Result<UploadSummary, UploadError> {
        let start = Instant::now();
        let concurrency = self.config.concurrency;
        if concurrency == 0 {
            return Err(UploadError::ZeroConcurrency);
        }

        let (done_log, done) = DoneLog::open(&self.config.done_log)?;
        let mut error_log = ErrorLog::open(&self.config.error_log)?;
        let files = list_files(&self.config.source_dir).await?;

        let mut summary = UploadSummary {
            files: files.len(),
            ..UploadSummary::default()
        };
        let pending = self.select(files, &done, &mut error_log, &mut summary);
        info!(
            dir = %self.config.source_dir.display(),
            files = summary.files,
            pending = pending.len(),
            already_done = summary.already_done,
            skipped = summary.skipped,
            concurrency,
            "starting upload",
        );

        let logs = Arc::new(RunLogs {
            done: Mutex::new(done_log),
            errors: Mutex::new(error_log),
        });
        let budget = ConcurrencyBudget::new(concurrency);
        let (tx, rx) = mpsc::channel(concurrency);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let mut workers = JoinSet::new();
        for id in 0..concurrency.min(pending.len()) {
            let worker = Worker {
                id,
                store: self.store.clone(),
                config: Arc::clone(&self.config),
                budget: budget.clone(),
                logs: Arc::clone(&logs),
                jobs: Arc::clone(&rx),
            };
            workers.spawn(worker.run());
        }

        for file in pending {
            if tx.send(file).await.is_err() {
                error!("all upload workers exited early");
                break;
            }
        }
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(tally) => summary.merge(tally),
                Err(e) => error!(error = %e, "upload worker died"),
            }
        }

        summary.peak_in_flight = budget.peak();
        summary.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            uploaded = summary.uploaded,
            failed = summary.failed,
            already_done = summary.already_done,
            skipped = summary.skipped,
            peak_in_flight = summary.peak_in_flight,
            elapsed = %format_duration(start.elapsed()),
            "upload complete",
        );
        Ok(summary)
    }

    /// Filter the listing down to files that still need uploading.
    fn select(
        &self,
        files: Vec<String>,
        done: &DoneSet,
        error_log: &mut ErrorLog,
        summary: &mut UploadSummary,
    ) -> Vec<FileId> {
        let mut pending = Vec::new();
        for name in files {
            let reason = if !name.ends_with(&self.config.suffix) {
                format!("skipped: does not end with {}", self.config.suffix)
            } else if !DoneLog::can_record(&name) {
                "skipped: name cannot be recorded in the done log".to_string()
            } else if done.contains(&name) {
                summary.already_done += 1;
                continue;
            } else {
                pending.push(FileId::new(name));
                continue;
            };

            debug!(file = %name, "{reason}");
            if let Err(e) = error_log.append(&name, &reason) {
                error!(file = %name, error = %e, "failed to write error log");
            }
            summary.skipped += 1;
        }
        pending
    }
}

/// Names of the regular files in `dir`, sorted.
async fn list_files(dir: &Path) -> Result<Vec<String>, UploadError> {
    let list_err = |source: std::io::Error| UploadError::ListDir {
        path: dir.to_owned(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let file_type = entry.file_type().await.map_err(list_err)?;
        if !file_type.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "skipping file with non UTF-8 name"),
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
