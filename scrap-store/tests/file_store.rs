use scrap_store::{BlobStore, CursorStore, FileStore};
use tempfile::TempDir;

#[tokio::test]
async fn missing_key_reads_as_none() {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::new(tmp.path());
    assert!(store.get("cursor.json").await.unwrap().is_none());
}

#[tokio::test]
async fn put_then_get_round_trips_bytes() {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::new(tmp.path());

    store.put("cursor.json", b"{\"last_id\":\"42\"}".to_vec()).await.unwrap();
    let back = store.get("cursor.json").await.unwrap().unwrap();
    assert_eq!(back, b"{\"last_id\":\"42\"}");
}

#[tokio::test]
async fn put_replaces_whole_value() {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::new(tmp.path());

    store.put("k", b"a much longer first value".to_vec()).await.unwrap();
    store.put("k", b"short".to_vec()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().unwrap(), b"short");
}

#[tokio::test]
async fn put_creates_the_state_directory() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("state").join("scrap-journal");
    let store = FileStore::new(&nested);

    store.put("k", b"v".to_vec()).await.unwrap();
    assert!(nested.join("k").exists());
}

#[tokio::test]
async fn cursor_survives_a_new_store_handle() {
    let tmp = TempDir::new().unwrap();
    {
        let store = FileStore::new(tmp.path());
        CursorStore::new(&store).save("987654321").await.unwrap();
    }
    let store = FileStore::new(tmp.path());
    let cursor = CursorStore::new(&store).load().await.unwrap().unwrap();
    assert_eq!(cursor.last_id, "987654321");
}
