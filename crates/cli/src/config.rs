// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ferry.toml` configuration.
//!
//! Precedence, highest first: command-line flags, `FERRY_*` environment
//! variables, the config file, built-in defaults. Every section and key is
//! optional.

use ferry_engine::{UploadConfig, DEFAULT_HANDLER_TIMEOUT, DEFAULT_JOB_TIMEOUT, DEFAULT_SUFFIX};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "ferry.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub convert: ConvertConfig,
    pub analytics: AnalyticsConfig,
    pub upload: UploadSection,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub content_input: PathBuf,
    pub image_input: PathBuf,
    pub out_dir: PathBuf,
    /// Per-line handler limit; 0 waits forever
    pub handler_timeout_secs: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            content_input: PathBuf::from("input/ContentInfo.txt"),
            image_input: PathBuf::from("input/ImageInfo.txt"),
            out_dir: PathBuf::from("output"),
            handler_timeout_secs: DEFAULT_HANDLER_TIMEOUT.as_secs(),
        }
    }
}

impl ConvertConfig {
    pub fn handler_timeout(&self) -> Option<Duration> {
        secs_limit(self.handler_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input/analytics.tsv"),
            out_dir: PathBuf::from("output2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadSection {
    pub source_dir: PathBuf,
    pub suffix: String,
    pub concurrency: usize,
    /// Per-file limit; 0 waits forever
    pub job_timeout_secs: u64,
    pub done_log: PathBuf,
    pub error_log: PathBuf,
    pub key_prefix: String,
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("output"),
            suffix: DEFAULT_SUFFIX.to_string(),
            concurrency: ferry_core::DEFAULT_CONCURRENCY,
            job_timeout_secs: DEFAULT_JOB_TIMEOUT.as_secs(),
            done_log: PathBuf::from("done.log"),
            error_log: PathBuf::from("error.log"),
            key_prefix: String::new(),
        }
    }
}

impl UploadSection {
    pub fn to_engine_config(&self) -> UploadConfig {
        let mut config = UploadConfig::new(&self.source_dir, &self.done_log, &self.error_log);
        config.suffix = self.suffix.clone();
        config.concurrency = self.concurrency;
        config.job_timeout = secs_limit(self.job_timeout_secs);
        config.key_prefix = self.key_prefix.clone();
        config
    }
}

/// Where uploads go: an HTTP endpoint or a local mirror directory
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub dir: Option<PathBuf>,
    pub token: Option<String>,
}

impl StoreConfig {
    /// Point uploads at an HTTP endpoint, replacing any directory
    pub fn set_url(&mut self, url: String) {
        self.url = Some(url);
        self.dir = None;
    }

    /// Point uploads at a local directory, replacing any URL
    pub fn set_dir(&mut self, dir: PathBuf) {
        self.dir = Some(dir);
        self.url = None;
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Values taken from the environment, applied over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub concurrency: Option<usize>,
    pub suffix: Option<String>,
    pub job_timeout_secs: Option<u64>,
    pub handler_timeout_secs: Option<u64>,
    pub store_url: Option<String>,
    pub store_dir: Option<PathBuf>,
    pub store_token: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load the config file, if any.
    ///
    /// An explicitly named file must exist; the default `./ferry.toml` is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.concurrency {
            self.upload.concurrency = v;
        }
        if let Some(v) = overrides.suffix {
            self.upload.suffix = v;
        }
        if let Some(v) = overrides.job_timeout_secs {
            self.upload.job_timeout_secs = v;
        }
        if let Some(v) = overrides.handler_timeout_secs {
            self.convert.handler_timeout_secs = v;
        }
        if let Some(v) = overrides.store_url {
            self.store.set_url(v);
        }
        if let Some(v) = overrides.store_dir {
            self.store.set_dir(v);
        }
        if let Some(v) = overrides.store_token {
            self.store.token = Some(v);
        }
        if let Some(v) = overrides.log_level {
            self.logging.level = v;
        }
        if let Some(v) = overrides.log_file {
            self.logging.file = Some(v);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "upload.concurrency must be at least 1".to_string(),
            ));
        }
        if self.upload.suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "upload.suffix must not be empty".to_string(),
            ));
        }
        if self.store.url.is_some() && self.store.dir.is_some() {
            return Err(ConfigError::Invalid(
                "set only one of store.url and store.dir".to_string(),
            ));
        }
        Ok(())
    }
}

fn secs_limit(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
