//! Export rows become record documents

use crate::prelude::*;

fn project_with_exports() -> Project {
    let project = Project::empty();
    let content = [
        content_row("Id", "Size"),
        content_row("Apple", "1024"),
        content_row("", "5"),
        content_row("pear", "2KB"),
    ];
    project.file("input/ContentInfo.txt", &(content.join("\n") + "\n"));
    let images = [image_row("Id", 0, 0), image_row("Apple", 640, 480), image_row("ghost", 1, 1)];
    project.file("input/ImageInfo.txt", &(images.join("\n") + "\n"));
    project
}

#[test]
fn convert_writes_records_with_dzi() {
    let project = project_with_exports();

    project
        .ferry()
        .args(&["convert"])
        .passes()
        .stdout_has("4 lines, 2 written")
        .stdout_has("1 updated");

    let apple: serde_json::Value = serde_json::from_str(&project.read("output/_Apple.json")).unwrap();
    assert_eq!(apple["id"], "Apple");
    assert_eq!(apple["size"], 1024);
    assert_eq!(apple["ready"], false);
    assert_eq!(apple["dzi"]["width"], 640);
    assert_eq!(apple["dzi"]["height"], 480);

    let pear: serde_json::Value = serde_json::from_str(&project.read("output/pear.json")).unwrap();
    assert_eq!(pear["size"], 2);
    assert!(pear.get("dzi").is_none());
    assert!(!project.exists("output/ghost.json"));
}

#[test]
fn content_never_overwrites_existing_records() {
    let project = project_with_exports();
    project.file("output/pear.json", "{\"id\": \"pear\", \"ready\": true}");

    project.ferry().args(&["content"]).passes();

    let pear: serde_json::Value = serde_json::from_str(&project.read("output/pear.json")).unwrap();
    assert_eq!(pear["ready"], true);
}

#[test]
fn json_output_has_one_summary_per_pass() {
    let project = project_with_exports();

    let out = project.ferry().args(&["convert", "-o", "json"]).passes();
    let json = out.json();

    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["written"], 2);
    assert_eq!(json[1]["updated"], 1);
}

#[test]
fn bad_id_rows_are_logged() {
    let project = project_with_exports();
    project.ferry().args(&["content"]).passes().stderr_has("bad ID");
}
