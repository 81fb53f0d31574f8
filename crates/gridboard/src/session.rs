//! One dashboard session: engine + store, wired.
//!
//! [`DashboardSession`] owns a [`Reconciler`] bound to a canvas surface
//! and a [`LayoutStore`] bound to a storage backend, and implements the
//! flows that need both: save the current tree (optionally binding it
//! to the page being viewed), save just the selected subtree, load a
//! layout or a page's layout, export. It also carries the UI state
//! that outlives single commands (edit/view mode, the current route
//! path, the last loaded layout) and resets it when the user leaves
//! the dashboard.

use crate::{Error, Result};
use gridboard_core::WidgetOptions;
use gridboard_engine::{Command, Effect, ExportArtifact, GridSurface, Reconciler};
use gridboard_store::{LayoutId, LayoutStore, StorageBackend, Thumbnail};

/// A dashboard instance with its collaborators injected.
#[derive(Debug)]
pub struct DashboardSession<S: GridSurface, B: StorageBackend> {
    engine: Reconciler<S>,
    store: LayoutStore<B>,
    edit_mode: bool,
    current_path: Option<String>,
    last_loaded: Option<LayoutId>,
}

impl<S: GridSurface, B: StorageBackend> DashboardSession<S, B> {
    /// Start a session over a fresh engine.
    #[must_use]
    pub fn new(surface: S, store: LayoutStore<B>) -> Self {
        Self::from_parts(Reconciler::new(surface), store)
    }

    /// Start a session over a pre-configured engine (seeded ids, custom
    /// grid).
    #[must_use]
    pub fn from_parts(engine: Reconciler<S>, store: LayoutStore<B>) -> Self {
        Self {
            engine,
            store,
            edit_mode: false,
            current_path: None,
            last_loaded: None,
        }
    }

    /// The engine, for enqueueing commands and reading projections.
    #[must_use]
    pub fn engine(&self) -> &Reconciler<S> {
        &self.engine
    }

    /// Mutable engine access.
    pub fn engine_mut(&mut self) -> &mut Reconciler<S> {
        &mut self.engine
    }

    /// The persistence adapter.
    #[must_use]
    pub fn store(&self) -> &LayoutStore<B> {
        &self.store
    }

    /// Mutable store access (page management).
    pub fn store_mut(&mut self) -> &mut LayoutStore<B> {
        &mut self.store
    }

    // ── UI state ────────────────────────────────────────────────────────

    /// Whether the canvas is editable.
    #[must_use]
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Switch between edit and view mode.
    pub fn set_edit_mode(&mut self, edit: bool) {
        self.edit_mode = edit;
    }

    /// Toggle edit/view mode.
    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
    }

    /// The route path the user is viewing, if any.
    #[must_use]
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Set the viewed route path without loading anything.
    pub fn set_current_path(&mut self, path: Option<String>) {
        self.current_path = path;
    }

    /// The layout most recently loaded into the canvas, if it still
    /// resolves.
    #[must_use]
    pub fn last_loaded(&self) -> Option<&LayoutId> {
        self.last_loaded.as_ref()
    }

    /// Reset per-visit state when the user navigates away: view mode,
    /// selection, any unprocessed command, and the loaded-layout marker.
    pub fn leave_dashboard(&mut self) {
        self.edit_mode = false;
        self.engine.select(None);
        self.engine.clear_pending();
        self.last_loaded = None;
    }

    // ── Save / load flows ───────────────────────────────────────────────

    /// Serialize the current tree and store it as a new named layout.
    ///
    /// When the session has a current path with a matching page, that
    /// page's grid binding is rewritten to the new layout.
    pub fn save_layout(
        &mut self,
        name: impl Into<String>,
        thumbnail: Option<Thumbnail>,
    ) -> Result<LayoutId> {
        self.engine.settle();
        let items = self.engine.snapshot().to_vec();
        let id = self
            .store
            .save_layout(name, items, thumbnail, self.current_path.as_deref())?;
        Ok(id)
    }

    /// Store just the subtree rooted at the current selection. Nothing
    /// selected (or a stale selection) logs and returns `Ok(None)`; no
    /// page binding is touched.
    pub fn save_selection(
        &mut self,
        name: impl Into<String>,
        thumbnail: Option<Thumbnail>,
    ) -> Result<Option<LayoutId>> {
        let Some(items) = self.engine.serialize_selection() else {
            tracing::warn!("save selection: nothing selected; no-op");
            return Ok(None);
        };
        let id = self.store.save_layout(name, items, thumbnail, None)?;
        Ok(Some(id))
    }

    /// Load a specific layout, or the most recently updated one when
    /// `id` is `None`. Unknown ids load an explicit empty layout.
    pub fn load_layout(&mut self, id: Option<&LayoutId>) {
        let resolved = match id {
            Some(id) => self.store.layout(id).map(|l| l.id.clone()),
            None => self.store.latest_layout().map(|l| l.id.clone()),
        };
        let items = self.store.items_for_load(id);
        self.load_items(items);
        self.last_loaded = resolved;
    }

    /// Navigate to a page: remember its path (so saves bind to it) and
    /// load its layout. Missing pages, unbound pages, and dangling
    /// bindings all load an explicit empty layout.
    pub fn load_for_page(&mut self, path: &str) {
        self.current_path = Some(path.to_string());
        self.last_loaded = self
            .store
            .page_by_path(path)
            .and_then(|p| p.grid_id.clone())
            .filter(|id| self.store.layout(id).is_some());
        let items = self.store.items_for_page(path);
        self.load_items(items);
    }

    /// Delete a saved layout. Pages referencing it keep a dangling
    /// binding that loads as empty.
    pub fn delete_layout(&mut self, id: &LayoutId) -> Result<()> {
        self.store.delete_layout(id).map_err(Error::Storage)
    }

    /// Produce the downloadable export of the current tree.
    pub fn export(&mut self) -> Option<ExportArtifact> {
        self.engine.enqueue(Command::ExportLayout);
        match self.engine.process() {
            Some(Effect::Export(artifact)) => Some(artifact),
            None => None,
        }
    }

    fn load_items(&mut self, items: Vec<gridboard_core::WidgetNode>) {
        self.engine.enqueue(Command::LoadLayout(
            items.into_iter().map(WidgetOptions::from).collect(),
        ));
        self.engine.process_and_settle();
    }
}
