// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Persisted files for ferry: resume log, error log and record documents

mod append;
mod done_log;
mod error_log;
mod record_store;

pub use done_log::{DoneLog, DoneLogError, DoneSet};
pub use error_log::{ErrorEntry, ErrorLog, ErrorLogError};
pub use record_store::{RecordError, RecordStore};
