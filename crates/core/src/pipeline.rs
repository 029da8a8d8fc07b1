// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential line pipeline state machine.
//!
//! The state machine owns the pending line queue and decides, for every
//! incoming event, whether a line should be dispatched to the handler or
//! whether the pipeline has completed. It performs no I/O; drivers feed it
//! events and execute the returned effect.
//!
//! Invariants:
//! - lines are dispatched in arrival order
//! - at most one line is dispatched at a time
//! - `Complete` is emitted exactly once, when the source is exhausted,
//!   no handler is running and the queue is empty

use std::collections::VecDeque;
use thiserror::Error;

/// Events fed into the pipeline by its driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The source produced a line
    Line(String),
    /// The source will produce no more lines
    SourceClosed,
    /// The handler for the most recently dispatched line finished
    HandlerDone,
}

/// Work the driver must perform in response to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEffect {
    /// Run the handler for this line
    Dispatch(String),
    /// All lines are handled and the source is closed
    Complete,
}

/// Driver protocol violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("line received after the source closed")]
    LineAfterClose,
    #[error("source closed twice")]
    AlreadyClosed,
    #[error("handler completion reported while no handler was running")]
    UnexpectedDone,
    #[error("event received after the pipeline completed")]
    AlreadyCompleted,
}

/// Pending queue plus the two flags that decide completion.
#[derive(Debug, Default)]
pub struct PipelineState {
    queue: VecDeque<String>,
    handler_running: bool,
    source_exhausted: bool,
    completed: bool,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event, returning at most one effect for the driver.
    pub fn apply(&mut self, event: PipelineEvent) -> Result<Option<PipelineEffect>, PipelineError> {
        if self.completed {
            return Err(PipelineError::AlreadyCompleted);
        }

        match event {
            PipelineEvent::Line(line) => self.on_line(line),
            PipelineEvent::SourceClosed => self.on_source_closed(),
            PipelineEvent::HandlerDone => self.on_handler_done(),
        }
    }

    fn on_line(&mut self, line: String) -> Result<Option<PipelineEffect>, PipelineError> {
        if self.source_exhausted {
            return Err(PipelineError::LineAfterClose);
        }

        self.queue.push_back(line);
        if self.handler_running {
            return Ok(None);
        }

        self.handler_running = true;
        Ok(self.queue.pop_front().map(PipelineEffect::Dispatch))
    }

    fn on_source_closed(&mut self) -> Result<Option<PipelineEffect>, PipelineError> {
        if self.source_exhausted {
            return Err(PipelineError::AlreadyClosed);
        }

        self.source_exhausted = true;
        Ok(self.complete_if_drained())
    }

    fn on_handler_done(&mut self) -> Result<Option<PipelineEffect>, PipelineError> {
        if !self.handler_running {
            return Err(PipelineError::UnexpectedDone);
        }

        if let Some(next) = self.queue.pop_front() {
            return Ok(Some(PipelineEffect::Dispatch(next)));
        }

        self.handler_running = false;
        Ok(self.complete_if_drained())
    }

    fn complete_if_drained(&mut self) -> Option<PipelineEffect> {
        if self.source_exhausted && !self.handler_running && self.queue.is_empty() {
            self.completed = true;
            Some(PipelineEffect::Complete)
        } else {
            None
        }
    }

    /// Number of lines waiting behind the running handler
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_handler_running(&self) -> bool {
        self.handler_running
    }

    pub fn is_source_exhausted(&self) -> bool {
        self.source_exhausted
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
