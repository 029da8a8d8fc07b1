// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use crate::config::Overrides;
use std::path::PathBuf;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = var(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("warning: ignoring {name}={raw}: not a valid value");
            None
        }
    }
}

/// Config file named by FERRY_CONFIG
pub fn config_path() -> Option<PathBuf> {
    var("FERRY_CONFIG").map(PathBuf::from)
}

/// All `FERRY_*` settings that override the config file
pub fn overrides() -> Overrides {
    Overrides {
        concurrency: parse("FERRY_CONCURRENCY"),
        suffix: var("FERRY_SUFFIX"),
        job_timeout_secs: parse("FERRY_JOB_TIMEOUT_SECS"),
        handler_timeout_secs: parse("FERRY_HANDLER_TIMEOUT_SECS"),
        store_url: var("FERRY_STORE_URL"),
        store_dir: var("FERRY_STORE_DIR").map(PathBuf::from),
        store_token: var("FERRY_STORE_TOKEN"),
        log_level: var("FERRY_LOG"),
        log_file: var("FERRY_LOG_FILE").map(PathBuf::from),
    }
}
