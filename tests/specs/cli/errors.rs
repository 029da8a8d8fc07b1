//! Setup failures exit non-zero with a single readable message

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    cli().args(&["frobnicate"]).fails();
}

#[test]
fn missing_input_fails_with_path() {
    let project = Project::empty();
    let out = project
        .ferry()
        .args(&["content", "--content-input", "nope.txt"])
        .fails()
        .stderr_has("Error: cannot process nope.txt");
    assert_eq!(out.code(), Some(1));
}

#[test]
fn upload_without_store_fails() {
    let project = Project::empty();
    project.file("output/a.json", "{}");

    project
        .ferry()
        .args(&["upload"])
        .fails()
        .stderr_has("no upload destination");
    assert!(!project.exists("done.log"));
}

#[test]
fn zero_concurrency_is_rejected() {
    let project = Project::empty();
    project
        .ferry()
        .args(&["upload", "-j", "0", "--store-dir", "remote"])
        .fails()
        .stderr_has("concurrency must be at least 1");
}
