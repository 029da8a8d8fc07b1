// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ferry - export conversion and resumable uploads

mod commands;
mod config;
mod env;
mod logging;
mod output;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use commands::analytics::AnalyticsArgs;
use commands::convert::{ConvertArgs, Passes};
use commands::upload::UploadArgs;
use config::Config;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ferry",
    version,
    about = "Convert export files to JSON records and upload them"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    /// Config file [default: $FERRY_CONFIG or ./ferry.toml]
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a record document for each content export row
    Content(ConvertArgs),
    /// Add image tiling info to existing record documents
    Images(ConvertArgs),
    /// Run content then images
    Convert(ConvertArgs),
    /// Rank items by page views and embeds
    Analytics(AnalyticsArgs),
    /// Upload record documents, skipping those already uploaded
    Upload(UploadArgs),
}

impl Commands {
    fn apply(self, config: &mut Config) -> Command {
        match self {
            Commands::Content(args) => {
                args.apply(config);
                Command::Convert(Passes::Content)
            }
            Commands::Images(args) => {
                args.apply(config);
                Command::Convert(Passes::Images)
            }
            Commands::Convert(args) => {
                args.apply(config);
                Command::Convert(Passes::Both)
            }
            Commands::Analytics(args) => {
                args.apply(config);
                Command::Analytics
            }
            Commands::Upload(args) => {
                args.apply(config);
                Command::Upload
            }
        }
    }
}

/// What to run once flags are folded into the config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Convert(Passes),
    Analytics,
    Upload,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered so
/// context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

/// Load the config file and fold in environment and flags.
fn resolve_config(cli_config: Option<PathBuf>, log_file: Option<PathBuf>) -> Result<Config> {
    let path = cli_config.or_else(env::config_path);
    let mut config = Config::load(path.as_deref())?;
    config.apply_overrides(env::overrides());
    if let Some(file) = log_file {
        config.logging.file = Some(file);
    }
    Ok(config)
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        // No subcommand provided: print help and exit 0
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut config = resolve_config(cli.config, cli.log_file)?;
    let command = command.apply(&mut config);
    config.validate()?;
    let _guard = logging::setup(&config.logging, cli.verbose)?;

    match command {
        Command::Convert(passes) => commands::convert::handle(passes, &config.convert, format).await,
        Command::Analytics => commands::analytics::handle(&config.analytics, format).await,
        Command::Upload => commands::upload::handle(&config.upload, &config.store, format).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
