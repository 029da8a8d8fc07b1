// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn store_flag_replaces_configured_store() {
    let mut config = Config::default();
    config.store.set_url("http://example.com".to_string());

    UploadArgs {
        store_dir: Some(PathBuf::from("mirror")),
        concurrency: Some(2),
        ..UploadArgs::default()
    }
    .apply(&mut config);

    assert_eq!(config.store.dir, Some(PathBuf::from("mirror")));
    assert!(config.store.url.is_none());
    assert_eq!(config.upload.concurrency, 2);
}

#[tokio::test]
async fn upload_to_directory_store_resumes() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("records");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("a.json"), "{}").unwrap();
    std::fs::write(source.join("b.json"), "[]").unwrap();
    let upload = UploadSection {
        source_dir: source,
        done_log: dir.path().join("done.log"),
        error_log: dir.path().join("error.log"),
        ..UploadSection::default()
    };
    let remote = dir.path().join("remote");

    let first = run(DirStore::new(&remote), &upload).await.unwrap();
    let second = run(DirStore::new(&remote), &upload).await.unwrap();

    assert_eq!(first.uploaded, 2);
    assert_eq!(second.uploaded, 0);
    assert_eq!(second.already_done, 2);
    assert_eq!(std::fs::read_to_string(remote.join("b.json")).unwrap(), "[]");
}

#[tokio::test]
async fn no_store_configured_is_an_error() {
    let err = handle(&UploadSection::default(), &StoreConfig::default(), OutputFormat::Text)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no upload destination"));
}
