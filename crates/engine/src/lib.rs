// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ferry execution engine: line pipeline, record transformers, uploads

mod line_pipeline;
pub mod transform;
mod upload;

pub use line_pipeline::{
    HandlerError, LineHandler, LineOutcome, PipelineConfig, PipelineRunError, PipelineSummary,
    SequentialPipeline, SkipReason, DEFAULT_HANDLER_TIMEOUT,
};
pub use upload::{
    FailedUpload, UploadConfig, UploadEngine, UploadError, UploadSummary, DEFAULT_JOB_TIMEOUT,
    DEFAULT_SUFFIX,
};
