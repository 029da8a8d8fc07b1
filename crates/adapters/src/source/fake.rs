// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory line source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LineSource, SourceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

/// Replays fixed lines, optionally pausing before each one.
pub struct VecLineSource {
    lines: VecDeque<String>,
    delay: Option<Duration>,
    close_delay: Option<Duration>,
    fail_after: Option<usize>,
    emitted: usize,
}

impl VecLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            delay: None,
            close_delay: None,
            fail_after: None,
            emitted: 0,
        }
    }

    /// Pause before yielding each line
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Pause before reporting exhaustion
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }

    /// Return a read error after `n` lines instead of continuing
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

#[async_trait]
impl LineSource for VecLineSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        if self.fail_after == Some(self.emitted) {
            self.fail_after = None;
            return Err(SourceError::Read {
                line: self.emitted as u64,
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, "injected failure"),
            });
        }

        match self.lines.pop_front() {
            Some(line) => {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.emitted += 1;
                Ok(Some(line))
            }
            None => {
                if let Some(delay) = self.close_delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(None)
            }
        }
    }
}
