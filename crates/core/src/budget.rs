// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency budget for in-flight uploads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Default ceiling on concurrently in-flight uploads
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Live count of in-flight work against a fixed ceiling.
///
/// Cloning shares the same counter. `0 <= in_flight <= cap` holds at all
/// times: acquisition fails rather than exceeding the cap, and a permit
/// gives its unit back when dropped.
#[derive(Debug, Clone)]
pub struct ConcurrencyBudget {
    inner: Arc<BudgetInner>,
}

#[derive(Debug)]
struct BudgetInner {
    cap: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyBudget {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: Arc::new(BudgetInner {
                cap,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Take one unit of the budget, or `None` if the cap is reached.
    pub fn try_acquire(&self) -> Option<BudgetPermit> {
        let mut current = self.inner.in_flight.load(Ordering::Acquire);
        loop {
            if current >= self.inner.cap {
                return None;
            }
            match self.inner.in_flight.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.inner.peak.fetch_max(current + 1, Ordering::AcqRel);
                    return Some(BudgetPermit {
                        inner: Arc::clone(&self.inner),
                    });
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn cap(&self) -> usize {
        self.inner.cap
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Highest in-flight count observed so far
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::Acquire)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }
}

impl Default for ConcurrencyBudget {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

/// One unit of [`ConcurrencyBudget`], released on drop.
#[derive(Debug)]
pub struct BudgetPermit {
    inner: Arc<BudgetInner>,
}

impl Drop for BudgetPermit {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
