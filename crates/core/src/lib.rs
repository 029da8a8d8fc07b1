// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ferry-core: pure state for the ferry batch tools

pub mod budget;
pub mod fields;
pub mod id;
pub mod pipeline;
pub mod time_fmt;
pub mod upload;

pub use budget::{BudgetPermit, ConcurrencyBudget, DEFAULT_CONCURRENCY};
pub use fields::{parse_int_prefix, Row};
pub use id::{FileId, RecordId};
pub use pipeline::{PipelineEffect, PipelineError, PipelineEvent, PipelineState};
pub use time_fmt::{format_duration, format_elapsed};
pub use upload::{TransitionError, UploadJob, UploadStatus};
