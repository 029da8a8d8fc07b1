//! Config file and environment precedence

use crate::prelude::*;

#[test]
fn config_file_in_working_directory_is_used() {
    let project = Project::empty();
    project.file("ferry.toml", "[upload]\nsource_dir = \"records\"\n\n[store]\ndir = \"remote\"\n");
    project.file("records/a.json", "{}");

    project.ferry().args(&["upload"]).passes();

    assert_eq!(project.read("remote/a.json"), "{}");
}

#[test]
fn environment_overrides_config_file() {
    let project = Project::empty();
    project.file("ferry.toml", "[store]\ndir = \"remote\"\n");
    project.file("output/a.json", "{}");

    project
        .ferry()
        .env("FERRY_STORE_DIR", "elsewhere")
        .args(&["upload"])
        .passes();

    assert!(project.exists("elsewhere/a.json"));
    assert!(!project.exists("remote"));
}

#[test]
fn flag_overrides_environment() {
    let project = Project::empty();
    project.file("output/a.json", "{}");

    project
        .ferry()
        .env("FERRY_STORE_DIR", "from-env")
        .args(&["upload", "--store-dir", "from-flag"])
        .passes();

    assert!(project.exists("from-flag/a.json"));
}

#[test]
fn named_config_must_exist() {
    let project = Project::empty();
    project
        .ferry()
        .args(&["--config", "missing.toml", "upload"])
        .fails()
        .stderr_has("missing.toml");
}

#[test]
fn unknown_config_key_fails() {
    let project = Project::empty();
    project.file("ferry.toml", "[upload]\nconcurency = 3\n");
    project
        .ferry()
        .args(&["upload", "--store-dir", "remote"])
        .fails()
        .stderr_has("ferry.toml");
}

#[test]
fn log_file_receives_logs() {
    let project = Project::empty();
    project.file("output/a.json", "{}");

    project
        .ferry()
        .args(&["upload", "--store-dir", "remote", "--log-file", "logs/ferry.log"])
        .passes();

    assert!(project.read("logs/ferry.log").contains("upload complete"));
}
