// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::source::VecLineSource;
use crate::store::FakeStore;

#[tokio::test]
async fn traced_store_delegates() {
    let fake = FakeStore::new();
    fake.fail("bad.json", "nope");
    let store = TracedStore::new(fake.clone());

    store.put("ok.json", Box::pin(&b"1"[..]), 1).await.unwrap();
    assert!(store.put("bad.json", Box::pin(&b"2"[..]), 1).await.is_err());

    assert_eq!(fake.keys(), vec!["ok.json", "bad.json"]);
    assert_eq!(store.inner().calls().len(), 2);
}

#[tokio::test]
async fn traced_source_delegates() {
    let mut source = TracedSource::new(VecLineSource::new(["a", "b"]));

    assert_eq!(source.name(), "memory");
    assert_eq!(source.next_line().await.unwrap().as_deref(), Some("a"));
    assert_eq!(source.next_line().await.unwrap().as_deref(), Some("b"));
    assert!(source.next_line().await.unwrap().is_none());
    assert_eq!(source.lines, 2);
}
