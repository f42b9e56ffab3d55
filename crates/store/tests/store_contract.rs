use std::sync::Arc;
use store::{
    BorderSettings, BorderStyle, JsonFileBackend, MemoryBackend, StorageBackend, TabId, TabState,
    TabStatePatch, TabStateStore,
};

fn fresh_store() -> (TabStateStore, Arc<MemoryBackend>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = Arc::new(MemoryBackend::new());
    let store = TabStateStore::new(Arc::clone(&backend) as Arc<dyn StorageBackend>);
    (store, backend)
}

#[tokio::test]
async fn default_on_miss() {
    let (mut store, _) = fresh_store();
    assert_eq!(store.get(TabId(7)).await, TabState::default());
}

#[tokio::test]
async fn second_get_skips_the_backend() {
    let (mut store, backend) = fresh_store();
    let first = store.get(TabId(1)).await;
    let reads_after_first = backend.reads();
    let second = store.get(TabId(1)).await;
    assert_eq!(first, second);
    assert_eq!(
        backend.reads(),
        reads_after_first,
        "cached get must not touch the backend"
    );
}

#[tokio::test]
async fn set_merges_into_prior_state() {
    let (mut store, _) = fresh_store();
    let tab = TabId(3);
    store.set(tab, TabStatePatch::inspector(true)).await;
    let merged = store.set(tab, TabStatePatch::border(true)).await;
    assert!(merged.border_mode);
    assert!(merged.inspector_mode, "untouched flag must survive a merge");
    assert_eq!(store.get(tab).await, merged);
}

#[tokio::test]
async fn set_persists_under_the_stringified_tab_key() {
    let (mut store, backend) = fresh_store();
    store.set(TabId(42), TabStatePatch::border(true)).await;
    let raw = backend.raw("42").await.expect("persisted record");
    assert_eq!(raw, r#"{"borderMode":true,"inspectorMode":false}"#);
}

#[tokio::test]
async fn evict_forgets_cache_and_backend() {
    let (mut store, backend) = fresh_store();
    let tab = TabId(9);
    store.set(tab, TabStatePatch::border(true)).await;
    store.evict(tab).await;
    assert!(backend.raw("9").await.is_none());
    assert_eq!(
        store.get(tab).await,
        TabState::default(),
        "a fresh get after evict behaves like a never-seen tab"
    );
}

#[tokio::test]
async fn failed_read_falls_back_to_default_and_caches_it() {
    let (mut store, backend) = fresh_store();
    backend.fail_reads(true);
    assert_eq!(store.get(TabId(5)).await, TabState::default());
    backend.fail_reads(false);
    let reads_so_far = backend.reads();
    // The fallback value was cached, so this must not re-read.
    store.get(TabId(5)).await;
    assert_eq!(backend.reads(), reads_so_far);
}

#[tokio::test]
async fn failed_write_keeps_the_optimistic_cache_value() {
    let (mut store, backend) = fresh_store();
    let tab = TabId(11);
    backend.fail_writes(true);
    let merged = store.set(tab, TabStatePatch::border(true)).await;
    assert!(merged.border_mode);
    // Cache answers with the merged value even though nothing persisted.
    assert_eq!(store.get(tab).await, merged);
    assert!(backend.raw("11").await.is_none());
}

#[tokio::test]
async fn failed_remove_still_clears_the_cache() {
    let (mut store, backend) = fresh_store();
    let tab = TabId(13);
    store.set(tab, TabStatePatch::inspector(true)).await;
    backend.fail_removes(true);
    store.evict(tab).await;
    backend.fail_removes(false);
    backend.fail_reads(true);
    // Cache entry is gone: the next get hits the (failing) backend.
    assert_eq!(store.get(tab).await, TabState::default());
}

#[tokio::test]
async fn corrupt_persisted_state_degrades_to_default() {
    let (mut store, backend) = fresh_store();
    backend.write("21", "not json").await.unwrap();
    assert_eq!(store.get(TabId(21)).await, TabState::default());
}

#[tokio::test]
async fn border_settings_round_trip_with_snapping() {
    let (store, backend) = fresh_store();
    store
        .set_border_settings(BorderSettings {
            size: 2.4,
            style: BorderStyle::Dashed,
        })
        .await;
    assert_eq!(backend.raw("borderSize").await.as_deref(), Some("2.5"));
    assert_eq!(backend.raw("borderStyle").await.as_deref(), Some("dashed"));
    let settings = store.border_settings().await;
    assert_eq!(settings, BorderSettings::new(2.5, BorderStyle::Dashed));
}

#[tokio::test]
async fn border_settings_default_when_absent() {
    let (store, _) = fresh_store();
    assert_eq!(store.border_settings().await, BorderSettings::default());
}

#[tokio::test]
async fn file_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let backend = Arc::new(JsonFileBackend::open(&path).unwrap());
    let mut store = TabStateStore::new(Arc::clone(&backend) as Arc<dyn StorageBackend>);
    store.set(TabId(2), TabStatePatch::border(true)).await;
    store
        .set_border_settings(BorderSettings::new(3.0, BorderStyle::Dotted))
        .await;
    drop(store);
    drop(backend);

    let reopened = Arc::new(JsonFileBackend::open(&path).unwrap());
    let mut store = TabStateStore::new(reopened as Arc<dyn StorageBackend>);
    assert!(store.get(TabId(2)).await.border_mode);
    assert_eq!(
        store.border_settings().await,
        BorderSettings::new(3.0, BorderStyle::Dotted)
    );
}
