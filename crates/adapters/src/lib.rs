// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: line sources and remote stores

mod env;
pub mod source;
pub mod store;
pub mod traced;

pub use source::{FileLineSource, LineSource, SourceError};
pub use store::{ByteStream, DirStore, HttpStore, RemoteStore, StoreError};
pub use traced::{TracedSource, TracedStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use source::VecLineSource;
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, PutCall};
