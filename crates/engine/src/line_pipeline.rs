// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential line pipeline driver.
//!
//! Architecture:
//! - Producer task: drains the [`LineSource`] as fast as it yields and posts
//!   `Line`/`Closed` messages to the mailbox
//! - Handler tasks: one per dispatched line, posting `Done` when finished
//! - Driver loop: feeds mailbox messages into [`PipelineState`] and executes
//!   the effect it returns
//!
//! Only the driver touches the state, so ordering and the single completion
//! are decided by the state machine alone.

use ferry_adapters::{FileLineSource, LineSource, SourceError, TracedSource};
use ferry_core::{PipelineEffect, PipelineError, PipelineEvent, PipelineState, RecordId};
use ferry_storage::RecordError;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default per-line handler timeout
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(300);

/// Why a line produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than two fields
    NoData,
    /// Column header row
    Header,
    /// Identifier field missing or empty
    BadId,
    /// A field could not be interpreted
    Malformed,
    /// Output already exists and is not overwritten
    AlreadyExists,
    /// No existing record to update
    NoRecord,
}

/// Successful result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A new record was written
    Written(RecordId),
    /// An existing record was updated
    Updated(RecordId),
    /// The line was folded into an in-memory aggregate
    Accumulated,
    Skipped(SkipReason),
}

/// Errors from handling one line; never fatal to the pipeline
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("handler timed out after {0:?}")]
    TimedOut(Duration),
    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Fatal pipeline errors
#[derive(Debug, Error)]
pub enum PipelineRunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("pipeline protocol violation: {0}")]
    Protocol(#[from] PipelineError),
}

/// Per-line unit of work.
///
/// Returning from `handle` is the completion signal for the line; the
/// pipeline does not start the next line before that.
#[async_trait::async_trait]
pub trait LineHandler: Send + Sync + 'static {
    async fn handle(&self, line: String) -> Result<LineOutcome, HandlerError>;
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on a single handler; `None` waits forever
    pub handler_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            handler_timeout: Some(DEFAULT_HANDLER_TIMEOUT),
        }
    }
}

/// Counts for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub source: String,
    pub lines: u64,
    pub written: u64,
    pub updated: u64,
    pub accumulated: u64,
    pub skipped: u64,
    pub failed: u64,
    pub timed_out: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_error: Option<String>,
    pub elapsed_ms: u64,
}

impl PipelineSummary {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }

    /// Lines whose handler has finished, whatever the result
    pub fn handled(&self) -> u64 {
        self.written + self.updated + self.accumulated + self.skipped + self.failed
    }

    fn record(&mut self, line_no: u64, outcome: &Result<LineOutcome, HandlerError>) {
        match outcome {
            Ok(LineOutcome::Written(_)) => self.written += 1,
            Ok(LineOutcome::Updated(_)) => self.updated += 1,
            Ok(LineOutcome::Accumulated) => self.accumulated += 1,
            Ok(LineOutcome::Skipped(reason)) => {
                debug!(line = line_no, ?reason, "line skipped");
                self.skipped += 1;
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "line failed");
                if matches!(e, HandlerError::TimedOut(_)) {
                    self.timed_out += 1;
                }
                self.failed += 1;
            }
        }
    }
}

enum Message {
    Line(String),
    Closed(Option<SourceError>),
    Done {
        line_no: u64,
        outcome: Result<LineOutcome, HandlerError>,
    },
}

/// Runs a handler over every line of a source, one line at a time, in order.
pub struct SequentialPipeline<H> {
    handler: Arc<H>,
    config: PipelineConfig,
}

impl<H: LineHandler> SequentialPipeline<H> {
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, PipelineConfig::default())
    }

    pub fn with_config(handler: H, config: PipelineConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            config,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Open a text file and run the pipeline over its lines.
    pub async fn run_file(&self, path: &Path) -> Result<PipelineSummary, PipelineRunError> {
        let source = FileLineSource::open(path).await?;
        self.run(TracedSource::new(source)).await
    }

    /// Run until every line is handled and the source is exhausted.
    ///
    /// Resolves exactly once; resolving is the completion signal.
    pub async fn run<S: LineSource>(&self, source: S) -> Result<PipelineSummary, PipelineRunError> {
        let start = Instant::now();
        let mut summary = PipelineSummary::new(source.name());
        info!(source = %summary.source, "processing");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut producer = tokio::spawn(produce(source, tx.clone()));
        let mut producer_done = false;
        let mut state = PipelineState::new();
        let mut dispatched = 0u64;

        loop {
            let event = tokio::select! {
                biased;
                Some(message) = rx.recv() => match message {
                    Message::Line(line) => {
                        summary.lines += 1;
                        PipelineEvent::Line(line)
                    }
                    Message::Closed(error) => {
                        if let Some(e) = error {
                            warn!(source = %summary.source, error = %e, "source failed, treating as closed");
                            summary.source_error = Some(e.to_string());
                        }
                        info!(source = %summary.source, lines = summary.lines, "done with source");
                        PipelineEvent::SourceClosed
                    }
                    Message::Done { line_no, outcome } => {
                        summary.record(line_no, &outcome);
                        PipelineEvent::HandlerDone
                    }
                },
                joined = &mut producer, if !producer_done => {
                    producer_done = true;
                    match joined {
                        // The producer posts `Closed` itself before finishing
                        Ok(()) => continue,
                        Err(e) => {
                            warn!(source = %summary.source, error = %e, "source task died");
                            summary.source_error = Some(format!("source task died: {}", e));
                            PipelineEvent::SourceClosed
                        }
                    }
                }
            };

            match state.apply(event)? {
                Some(PipelineEffect::Dispatch(line)) => {
                    dispatched += 1;
                    self.dispatch(dispatched, line, tx.clone());
                }
                Some(PipelineEffect::Complete) => break,
                None => {}
            }
        }

        summary.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            source = %summary.source,
            lines = summary.lines,
            written = summary.written,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "pipeline complete",
        );
        Ok(summary)
    }

    /// Run the handler for one line on its own task.
    ///
    /// The handler runs inside a nested task so a panic or timeout still
    /// produces a `Done` message and never stalls the pipeline.
    fn dispatch(&self, line_no: u64, line: String, tx: mpsc::UnboundedSender<Message>) {
        let handler = Arc::clone(&self.handler);
        let limit = self.config.handler_timeout;

        tokio::spawn(async move {
            let mut task: JoinHandle<Result<LineOutcome, HandlerError>> =
                tokio::spawn(async move { handler.handle(line).await });

            let outcome = match limit {
                Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                    Ok(joined) => flatten(joined),
                    Err(_) => {
                        task.abort();
                        Err(HandlerError::TimedOut(limit))
                    }
                },
                None => flatten(task.await),
            };

            // The driver only stops listening after completion, which cannot
            // happen while this handler is outstanding.
            let _ = tx.send(Message::Done { line_no, outcome });
        });
    }
}

fn flatten(
    joined: Result<Result<LineOutcome, HandlerError>, tokio::task::JoinError>,
) -> Result<LineOutcome, HandlerError> {
    joined.unwrap_or_else(|e| Err(HandlerError::Panicked(e.to_string())))
}

async fn produce<S: LineSource>(mut source: S, tx: mpsc::UnboundedSender<Message>) {
    loop {
        match source.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Message::Line(line)).is_err() {
                    return;
                }
            }
            Ok(None) => {
                let _ = tx.send(Message::Closed(None));
                return;
            }
            Err(e) => {
                let _ = tx.send(Message::Closed(Some(e)));
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "line_pipeline_tests.rs"]
mod tests;
