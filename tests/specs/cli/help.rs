//! CLI help output specs

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("content")
        .stdout_has("images")
        .stdout_has("convert")
        .stdout_has("analytics")
        .stdout_has("upload");
}

#[test]
fn upload_help_shows_store_flags() {
    cli()
        .args(&["upload", "--help"])
        .passes()
        .stdout_has("--store-url")
        .stdout_has("--store-dir")
        .stdout_has("--concurrency");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
