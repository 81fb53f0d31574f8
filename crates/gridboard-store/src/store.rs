//! The persistence adapter.
//!
//! [`LayoutStore`] sits between the live engine and a
//! [`StorageBackend`]: it caches the persisted document in memory,
//! applies record mutations, and writes the whole document back on
//! every change. Storage failures are caught here: logged, surfaced
//! to the user through the [`Notifier`], and returned. They never
//! touch the engine's in-memory tree.
//!
//! Saving while a page path is "current" rewrites that page's
//! `grid_id`, so opening the page later loads the freshly saved
//! layout. Deleting a layout never cascades to pages; a dangling
//! `grid_id` loads as an explicit empty layout rather than surprising
//! the user with unrelated prior content.

use crate::backend::{StorageBackend, StorageResult, StoreData};
use crate::records::{LayoutId, LayoutRecord, PageId, PageRecord, PageTreeNode, Thumbnail, page_tree};
use gridboard_core::{IdGenerator, WidgetNode, unix_millis};

/// Weight of a user notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Informational (saved, loaded).
    Info,
    /// Something went wrong; the user should know.
    Error,
}

/// Transient user notification sink (a snackbar, a status line).
pub trait Notifier {
    /// Show a transient message.
    fn notify(&mut self, severity: Severity, message: &str);
}

/// Discards every notification.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _severity: Severity, _message: &str) {}
}

/// Persistence adapter over a storage backend.
pub struct LayoutStore<B: StorageBackend> {
    backend: B,
    data: StoreData,
    notifier: Box<dyn Notifier>,
    ids: IdGenerator,
}

impl<B: StorageBackend> LayoutStore<B> {
    /// Open a store, loading whatever the backend holds. Load failures
    /// start the session empty rather than failing construction.
    #[must_use]
    pub fn open(backend: B) -> Self {
        Self::open_with_notifier(backend, Box::new(NullNotifier))
    }

    /// Open with a notification sink for persistence failures.
    #[must_use]
    pub fn open_with_notifier(backend: B, mut notifier: Box<dyn Notifier>) -> Self {
        let data = match backend.load() {
            Ok(data) => data,
            Err(err) => {
                tracing::error!(backend = backend.name(), error = %err, "failed to load store");
                notifier.notify(Severity::Error, &format!("Failed to load saved data: {err}"));
                StoreData::default()
            }
        };
        Self {
            backend,
            data,
            notifier,
            ids: IdGenerator::new(),
        }
    }

    /// Seed the id generator (deterministic tests).
    #[must_use]
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.ids = IdGenerator::with_seed(seed);
        self
    }

    // ── Layouts ─────────────────────────────────────────────────────────

    /// Save `items` as a new immutable layout record.
    ///
    /// When `current_path` matches a page, that page's `grid_id` is
    /// rewritten to the new layout.
    pub fn save_layout(
        &mut self,
        name: impl Into<String>,
        items: Vec<WidgetNode>,
        thumbnail: Option<Thumbnail>,
        current_path: Option<&str>,
    ) -> StorageResult<LayoutId> {
        let id = LayoutId::from(self.ids.generate("layout"));
        self.data.layouts.push(LayoutRecord {
            id: id.clone(),
            name: name.into(),
            items,
            thumbnail,
            updated_at: unix_millis(),
        });
        if let Some(path) = current_path
            && let Some(page) = self.data.pages.iter_mut().find(|p| p.path == path)
        {
            tracing::debug!(page = %page.id, layout = %id, "page grid binding rewritten");
            page.grid_id = Some(id.clone());
        }
        self.persist("save layout")?;
        Ok(id)
    }

    /// Explicitly update a saved layout's items (and thumbnail, when
    /// given). Returns false when the id is unknown.
    pub fn update_layout(
        &mut self,
        id: &LayoutId,
        items: Vec<WidgetNode>,
        thumbnail: Option<Thumbnail>,
    ) -> StorageResult<bool> {
        let Some(record) = self.data.layouts.iter_mut().find(|l| &l.id == id) else {
            tracing::warn!(layout = %id, "update: layout not found");
            return Ok(false);
        };
        record.items = items;
        if thumbnail.is_some() {
            record.thumbnail = thumbnail;
        }
        record.updated_at = unix_millis();
        self.persist("update layout")?;
        Ok(true)
    }

    /// Delete a layout permanently. Pages referencing it keep their
    /// (now dangling) `grid_id`; the loader treats that as "no layout".
    pub fn delete_layout(&mut self, id: &LayoutId) -> StorageResult<()> {
        let before = self.data.layouts.len();
        self.data.layouts.retain(|l| &l.id != id);
        if self.data.layouts.len() == before {
            tracing::debug!(layout = %id, "delete: layout not found; no-op");
            return Ok(());
        }
        self.persist("delete layout")
    }

    /// Saved layouts, most recently updated first.
    #[must_use]
    pub fn layouts(&self) -> Vec<&LayoutRecord> {
        let mut layouts: Vec<&LayoutRecord> = self.data.layouts.iter().collect();
        layouts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        layouts
    }

    /// Look up one layout.
    #[must_use]
    pub fn layout(&self, id: &LayoutId) -> Option<&LayoutRecord> {
        self.data.layouts.iter().find(|l| &l.id == id)
    }

    /// The most recently updated layout, if any.
    #[must_use]
    pub fn latest_layout(&self) -> Option<&LayoutRecord> {
        self.data.layouts.iter().max_by_key(|l| l.updated_at)
    }

    /// Items to feed a LOAD_LAYOUT command: the given layout, or the
    /// most recent one when omitted. Unknown ids load empty.
    #[must_use]
    pub fn items_for_load(&self, id: Option<&LayoutId>) -> Vec<WidgetNode> {
        match id {
            Some(id) => match self.layout(id) {
                Some(record) => record.items.clone(),
                None => {
                    tracing::warn!(layout = %id, "load: layout not found; loading empty");
                    Vec::new()
                }
            },
            None => self
                .latest_layout()
                .map(|record| record.items.clone())
                .unwrap_or_default(),
        }
    }

    /// Items for the layout bound to the page at `path`. Any broken
    /// link in the chain (no page, no binding, dangling binding) loads
    /// an explicit empty layout.
    #[must_use]
    pub fn items_for_page(&self, path: &str) -> Vec<WidgetNode> {
        let Some(page) = self.page_by_path(path) else {
            tracing::debug!(path, "no page at path; loading empty");
            return Vec::new();
        };
        let Some(grid_id) = &page.grid_id else {
            return Vec::new();
        };
        match self.layout(grid_id) {
            Some(record) => record.items.clone(),
            None => {
                tracing::debug!(page = %page.id, layout = %grid_id, "dangling grid binding; loading empty");
                Vec::new()
            }
        }
    }

    // ── Pages ───────────────────────────────────────────────────────────

    /// Mint a page id.
    #[must_use]
    pub fn mint_page_id(&mut self) -> PageId {
        PageId::from(self.ids.generate("page"))
    }

    /// Insert or replace a page record by id.
    pub fn put_page(&mut self, page: PageRecord) -> StorageResult<()> {
        match self.data.pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => self.data.pages.push(page),
        }
        self.persist("save page")
    }

    /// Remove a page record. Children of a removed folder keep their
    /// `parent_id` and drop out of the tree projection.
    pub fn remove_page(&mut self, id: &PageId) -> StorageResult<()> {
        let before = self.data.pages.len();
        self.data.pages.retain(|p| &p.id != id);
        if self.data.pages.len() == before {
            return Ok(());
        }
        self.persist("remove page")
    }

    /// All page records, flat.
    #[must_use]
    pub fn pages(&self) -> &[PageRecord] {
        &self.data.pages
    }

    /// Look up a page by its route path.
    #[must_use]
    pub fn page_by_path(&self, path: &str) -> Option<&PageRecord> {
        self.data.pages.iter().find(|p| p.path == path)
    }

    /// The nav-sidebar tree projection.
    #[must_use]
    pub fn page_tree(&self) -> Vec<PageTreeNode> {
        page_tree(&self.data.pages)
    }

    // ── Plumbing ────────────────────────────────────────────────────────

    fn persist(&mut self, context: &str) -> StorageResult<()> {
        match self.backend.persist(&self.data) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(backend = self.backend.name(), context, error = %err, "persist failed");
                self.notifier
                    .notify(Severity::Error, &format!("Failed to {context}: {err}"));
                Err(err)
            }
        }
    }
}

impl<B: StorageBackend> std::fmt::Debug for LayoutStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("backend", &self.backend.name())
            .field("layouts", &self.data.layouts.len())
            .field("pages", &self.data.pages.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryStorage, StorageError};
    use crate::records::PageKind;
    use gridboard_core::WidgetNode;
    use std::sync::{Arc, Mutex};

    fn store() -> LayoutStore<MemoryStorage> {
        LayoutStore::open(MemoryStorage::new()).with_id_seed(13)
    }

    fn items() -> Vec<WidgetNode> {
        vec![WidgetNode::leaf("widget-1", 0, 0, 4, 4).with_content("Regular Widget")]
    }

    fn dashboard_page() -> PageRecord {
        PageRecord {
            id: "page-1".into(),
            name: "Dashboard".into(),
            path: "/".into(),
            visible: true,
            kind: PageKind::Page,
            parent_id: None,
            grid_id: None,
            order: Some(1),
            icon: Some("HomeIcon".into()),
        }
    }

    #[test]
    fn save_rewrites_current_pages_grid_binding() {
        let mut store = store();
        store.put_page(dashboard_page()).unwrap();

        let id = store
            .save_layout("Morning", items(), None, Some("/"))
            .unwrap();
        assert_eq!(store.page_by_path("/").unwrap().grid_id, Some(id.clone()));
        assert_eq!(store.items_for_page("/"), items());

        // Saving while viewing the page again moves the binding forward.
        let newer = store
            .save_layout("Evening", Vec::new(), None, Some("/"))
            .unwrap();
        assert_ne!(newer, id);
        assert_eq!(store.page_by_path("/").unwrap().grid_id, Some(newer));
    }

    #[test]
    fn save_without_matching_page_touches_no_binding() {
        let mut store = store();
        store.put_page(dashboard_page()).unwrap();
        store
            .save_layout("Elsewhere", items(), None, Some("/analytics"))
            .unwrap();
        assert_eq!(store.page_by_path("/").unwrap().grid_id, None);
    }

    #[test]
    fn items_for_load_prefers_most_recent() {
        let mut store = store();
        let first = store.save_layout("First", items(), None, None).unwrap();
        let second = store.save_layout("Second", Vec::new(), None, None).unwrap();
        store.update_layout(&second, Vec::new(), None).unwrap();

        assert_eq!(store.items_for_load(None), Vec::new());
        assert_eq!(store.items_for_load(Some(&first)), items());
        assert_eq!(store.items_for_load(Some(&"layout-missing".into())), Vec::new());
    }

    #[test]
    fn delete_does_not_cascade_to_pages() {
        let mut store = store();
        store.put_page(dashboard_page()).unwrap();
        let id = store.save_layout("Bound", items(), None, Some("/")).unwrap();

        store.delete_layout(&id).unwrap();
        assert!(store.layout(&id).is_none());
        // Binding dangles; the loader resolves it to an empty layout.
        assert_eq!(store.page_by_path("/").unwrap().grid_id, Some(id));
        assert_eq!(store.items_for_page("/"), Vec::new());
    }

    #[test]
    fn update_layout_requires_existing_record() {
        let mut store = store();
        assert!(!store.update_layout(&"layout-x".into(), items(), None).unwrap());
        let id = store.save_layout("Here", Vec::new(), None, None).unwrap();
        assert!(store.update_layout(&id, items(), None).unwrap());
        assert_eq!(store.layout(&id).unwrap().items, items());
    }

    #[test]
    fn layouts_sort_most_recent_first() {
        let mut store = store();
        let a = store.save_layout("A", Vec::new(), None, None).unwrap();
        let b = store.save_layout("B", Vec::new(), None, None).unwrap();
        store.update_layout(&a, items(), None).unwrap();
        let names: Vec<&str> = store.layouts().iter().map(|l| l.name.as_str()).collect();
        // `a` was touched last; on a same-millisecond tie the sort is
        // stable and insertion order already puts it first.
        assert_eq!(names.first(), Some(&"A"));
        assert!(store.layout(&b).is_some());
    }

    // A backend that always fails to write, for notification tests.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn name(&self) -> &str {
            "BrokenBackend"
        }
        fn load(&self) -> StorageResult<StoreData> {
            Ok(StoreData::default())
        }
        fn persist(&self, _data: &StoreData) -> StorageResult<()> {
            Err(StorageError::Corruption("disk on fire".into()))
        }
        fn clear(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier(Arc<Mutex<Vec<(Severity, String)>>>);

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, severity: Severity, message: &str) {
            self.0.lock().unwrap().push((severity, message.to_string()));
        }
    }

    #[test]
    fn persistence_failure_notifies_and_keeps_cache() {
        let notifier = RecordingNotifier::default();
        let mut store =
            LayoutStore::open_with_notifier(BrokenBackend, Box::new(notifier.clone()))
                .with_id_seed(1);

        let err = store.save_layout("Doomed", items(), None, None).unwrap_err();
        assert!(matches!(err, StorageError::Corruption(_)));

        let seen = notifier.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Severity::Error);
        assert!(seen[0].1.contains("save layout"));
        drop(seen);

        // The record survives in the cache for a later retry.
        assert_eq!(store.layouts().len(), 1);
    }
}
