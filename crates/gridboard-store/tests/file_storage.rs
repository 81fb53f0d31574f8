//! File-backend integration: real files, atomic rename, bad input.

use gridboard_core::WidgetNode;
use gridboard_store::{
    FileStorage, LayoutStore, PageKind, PageRecord, StorageBackend, StorageError, Thumbnail,
};

fn store_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("nested").join("store.json")
}

fn nested_items() -> Vec<WidgetNode> {
    vec![
        WidgetNode::leaf("widget-1", 0, 0, 4, 4).with_content("Regular Widget"),
        WidgetNode::container(
            "widget-container-1",
            4,
            0,
            8,
            6,
            vec![WidgetNode::leaf("nested-1", 0, 0, 3, 2).with_content("Nested 1")],
        ),
    ]
}

#[test]
fn layouts_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);

    let saved_id = {
        let mut store = LayoutStore::open(FileStorage::new(&path)).with_id_seed(4);
        store
            .put_page(PageRecord {
                id: "page-1".into(),
                name: "Dashboard".into(),
                path: "/".into(),
                visible: true,
                kind: PageKind::Page,
                parent_id: None,
                grid_id: None,
                order: None,
                icon: None,
            })
            .unwrap();
        store
            .save_layout(
                "Persisted",
                nested_items(),
                Some(Thumbnail::from_bytes(b"png-bytes")),
                Some("/"),
            )
            .unwrap()
    };

    let store = LayoutStore::open(FileStorage::new(&path));
    let record = store.layout(&saved_id).unwrap();
    assert_eq!(record.name, "Persisted");
    assert_eq!(record.items, nested_items());
    assert_eq!(
        record.thumbnail.as_ref().unwrap().decode().unwrap(),
        b"png-bytes"
    );
    assert_eq!(store.page_by_path("/").unwrap().grid_id, Some(saved_id));
}

#[test]
fn first_run_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileStorage::new(store_path(&dir));
    assert_eq!(backend.load().unwrap(), Default::default());
}

#[test]
fn unparseable_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = FileStorage::new(&path).load().unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[test]
fn future_format_version_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(
        &path,
        r#"{"format_version": 99, "layouts": [], "pages": []}"#,
    )
    .unwrap();

    assert_eq!(FileStorage::new(&path).load().unwrap(), Default::default());
}

#[test]
fn persist_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let backend = FileStorage::new(&path);
    backend.persist(&Default::default()).unwrap();

    assert!(path.exists());
    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path() != path)
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
}
