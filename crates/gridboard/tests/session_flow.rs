//! End-to-end session flows: build a tree, save it, bind it to a page,
//! come back later and load it again.

use gridboard::prelude::*;
use gridboard::{PageKind, PageRecord, Thumbnail};

fn session() -> DashboardSession<HeadlessSurface, MemoryStorage> {
    DashboardSession::from_parts(
        Reconciler::new(HeadlessSurface::new()).with_id_seed(8),
        LayoutStore::open(MemoryStorage::new()).with_id_seed(8),
    )
}

fn dashboard_page(path: &str) -> PageRecord {
    PageRecord {
        id: format!("page{}", path.replace('/', "-")).into(),
        name: "Dashboard".into(),
        path: path.into(),
        visible: true,
        kind: PageKind::Page,
        parent_id: None,
        grid_id: None,
        order: None,
        icon: Some("HomeIcon".into()),
    }
}

fn build_demo_tree(session: &mut DashboardSession<HeadlessSurface, MemoryStorage>) {
    session.engine_mut().enqueue(Command::AddWidget(
        WidgetOptions::new()
            .with_id("widget-1")
            .sized(4, 4)
            .with_content("Regular Widget"),
    ));
    session.engine_mut().process_and_settle();
    session.engine_mut().enqueue(Command::AddWidget(
        WidgetOptions::new()
            .with_id("widget-container-1")
            .sized(8, 6)
            .with_children(vec![
                WidgetOptions::new()
                    .with_id("nested-1")
                    .sized(3, 2)
                    .with_content("Nested 1"),
            ]),
    ));
    session.engine_mut().process_and_settle();
}

#[test]
fn save_then_load_round_trips_through_the_store() {
    let mut session = session();
    session.store_mut().put_page(dashboard_page("/")).unwrap();
    session.set_current_path(Some("/".into()));
    build_demo_tree(&mut session);
    let saved_snapshot = session.engine().snapshot().to_vec();

    let id = session
        .save_layout("Demo", Some(Thumbnail::from_bytes(b"thumb")))
        .unwrap();
    assert_eq!(
        session.store().page_by_path("/").unwrap().grid_id,
        Some(id.clone())
    );

    // Wipe the canvas, then come back to the page.
    session.engine_mut().enqueue(Command::LoadLayout(Vec::new()));
    session.engine_mut().process_and_settle();
    assert!(session.engine().snapshot().is_empty());

    session.load_for_page("/");
    assert_eq!(session.engine().snapshot(), &saved_snapshot[..]);
    assert_eq!(session.last_loaded(), Some(&id));
}

#[test]
fn save_selection_stores_only_the_subtree() {
    let mut session = session();
    build_demo_tree(&mut session);

    // Nothing selected: graceful no-op.
    assert_eq!(session.save_selection("Partial", None).unwrap(), None);

    session.engine_mut().select(Some("widget-container-1".into()));
    let id = session.save_selection("Partial", None).unwrap().unwrap();

    let record = session.store().layout(&id).unwrap();
    assert_eq!(record.items.len(), 1);
    assert_eq!(record.items[0].id, NodeId::from("widget-container-1"));
    assert_eq!(record.items[0].children().unwrap().len(), 1);
}

#[test]
fn load_without_id_falls_back_to_most_recent() {
    let mut session = session();
    build_demo_tree(&mut session);
    session.save_layout("Only", None).unwrap();

    session.engine_mut().enqueue(Command::LoadLayout(Vec::new()));
    session.engine_mut().process_and_settle();

    session.load_layout(None);
    assert_eq!(session.engine().tree().node_count(), 3);
}

#[test]
fn dangling_page_binding_loads_an_empty_layout() {
    let mut session = session();
    session.store_mut().put_page(dashboard_page("/")).unwrap();
    session.set_current_path(Some("/".into()));
    build_demo_tree(&mut session);

    let id = session.save_layout("Doomed", None).unwrap();
    session.delete_layout(&id).unwrap();

    session.load_for_page("/");
    assert!(session.engine().snapshot().is_empty());
    assert_eq!(session.last_loaded(), None);
}

#[test]
fn export_produces_the_download_artifact() {
    let mut session = session();
    build_demo_tree(&mut session);

    let artifact = session.export().unwrap();
    assert_eq!(artifact.file_name(), "grid-layout.json");

    let items: Vec<WidgetNode> = serde_json::from_str(&artifact.json).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[1].is_container());
}

#[test]
fn leaving_the_dashboard_resets_per_visit_state() {
    let mut session = session();
    build_demo_tree(&mut session);
    session.save_layout("Kept", None).unwrap();
    session.load_layout(None);

    session.set_edit_mode(true);
    session.engine_mut().select(Some("widget-1".into()));
    session
        .engine_mut()
        .enqueue(Command::RemoveWidget("widget-1".into()));

    session.leave_dashboard();
    assert!(!session.edit_mode());
    assert_eq!(session.engine().selected(), None);
    assert_eq!(session.engine().pending_command(), None);
    assert_eq!(session.last_loaded(), None);
    // The unprocessed removal must not have run.
    assert!(session.engine().tree().contains(&"widget-1".into()));
}
