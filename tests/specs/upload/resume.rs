//! Uploads resume from the done log and isolate per-file failures

use crate::prelude::*;

fn project_with_records(names: &[&str]) -> Project {
    let project = Project::empty();
    for name in names {
        project.file(format!("output/{name}"), &format!("{{\"id\": \"{name}\"}}"));
    }
    project
}

fn sorted_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(String::from).collect();
    lines.sort();
    lines
}

#[test]
fn upload_copies_records_and_logs_them() {
    let project = project_with_records(&["a.json", "b.json", "c.json"]);

    project
        .ferry()
        .args(&["upload", "--store-dir", "remote"])
        .passes()
        .stdout_has("uploaded 3, failed 0");

    assert_eq!(sorted_lines(&project.read("done.log")), vec!["a.json", "b.json", "c.json"]);
    assert_eq!(project.read("remote/b.json"), "{\"id\": \"b.json\"}");
    assert_eq!(project.read("error.log"), "");
}

#[test]
fn rerun_skips_done_files() {
    let project = project_with_records(&["file1.json", "file2.json", "file3.json"]);
    project.file("done.log", "file3.json\n");

    let out = project
        .ferry()
        .args(&["upload", "--store-dir", "remote", "-o", "json"])
        .passes();
    let json = out.json();

    assert_eq!(json["uploaded"], 2);
    assert_eq!(json["already_done"], 1);
    assert!(!project.exists("remote/file3.json"));
    assert_eq!(
        sorted_lines(&project.read("done.log")),
        vec!["file1.json", "file2.json", "file3.json"]
    );
}

#[test]
fn non_matching_files_go_to_error_log() {
    let project = project_with_records(&["a.json"]);
    project.file("output/readme.md", "hi");

    project
        .ferry()
        .args(&["upload", "--store-dir", "remote"])
        .passes();

    assert_eq!(
        project.read("error.log"),
        "readme.md: skipped: does not end with .json\n"
    );
    assert!(!project.exists("remote/readme.md"));
}

#[test]
fn unreachable_http_store_fails_each_file_but_run_completes() {
    let project = project_with_records(&["a.json", "b.json"]);

    project
        .ferry()
        .args(&["upload", "--store-url", "http://127.0.0.1:1/bucket", "-o", "json"])
        .passes();

    let errors = sorted_lines(&project.read("error.log"));
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("a.json: "));
    assert!(errors[1].starts_with("b.json: "));
    assert_eq!(project.read("done.log"), "");
}

#[test]
fn missing_source_dir_fails() {
    let project = Project::empty();
    project
        .ferry()
        .args(&["upload", "--store-dir", "remote", "--source-dir", "absent"])
        .fails()
        .stderr_has("absent");
}

#[test]
fn unterminated_done_log_entry_is_honored() {
    let project = project_with_records(&["a.json", "b.json"]);
    project.file("done.log", "b.json");

    project
        .ferry()
        .args(&["upload", "--store-dir", "remote"])
        .passes()
        .stdout_has("uploaded 1, failed 0, already done 1");

    assert!(!project.exists("remote/b.json"));
    assert_eq!(project.read("done.log"), "b.json\na.json\n");
}
