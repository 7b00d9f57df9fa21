use storage::{FileStore, KeyValueStore, keys};

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let store = FileStore::open(dir.path()).expect("open");
        store
            .write(keys::QUESTIONS, r#"[{"id":"1"}]"#)
            .expect("write questions");
        store.write(keys::AUTH_TOKEN, "token-abc").expect("write token");
    }

    let reopened = FileStore::open(dir.path()).expect("reopen");
    assert_eq!(
        reopened.read(keys::QUESTIONS).expect("read").as_deref(),
        Some(r#"[{"id":"1"}]"#)
    );
    assert_eq!(
        reopened.read(keys::AUTH_TOKEN).expect("read").as_deref(),
        Some("token-abc")
    );

    reopened.remove(keys::AUTH_TOKEN).expect("remove");
    assert_eq!(reopened.read(keys::AUTH_TOKEN).expect("read"), None);
    // The other key is untouched.
    assert!(reopened.read(keys::QUESTIONS).expect("read").is_some());
}

#[test]
fn missing_key_reads_as_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    assert_eq!(store.read(keys::PROGRESS).expect("read"), None);
}
