//! The reconciliation engine.
//!
//! [`Reconciler`] is the only writer of the canonical layout tree. It
//! claims commands from the single-slot queue, applies them against the
//! tree, drives the canvas surface's render bindings in lockstep, and
//! re-derives the serialized snapshot that the side panel and the
//! persistence layer read.
//!
//! # Processing model
//!
//! Idle → Processing → Idle, synchronously per command. The one
//! asymmetry is the post-mutation snapshot: a structural change kicks
//! off the surface's own layout recompute, which is not synchronous
//! with the call that caused it, so the engine records pending resync
//! work and re-serializes in [`settle`](Reconciler::settle). Hosts with
//! a real "layout settled" signal call `settle` from that callback;
//! [`process_and_settle`](Reconciler::process_and_settle) is the
//! immediate-drain stand-in when no such signal exists.
//!
//! Binding teardown is the opposite: it always happens synchronously
//! with the structural step, children before parents, so no render
//! resource outlives the node that owned it.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | MOVE target missing or a leaf | warn, tree unchanged, command cleared |
//! | MOVE under the node's own subtree | warn, tree unchanged, command cleared |
//! | REMOVE of an absent id | silent no-op, command cleared |
//! | select of a stale id | warn, selection cleared |
//! | geometry change for an unknown id | warn, entry skipped |

use crate::command::{Command, CommandSlot, ExportArtifact};
use crate::selection::Selection;
use crate::surface::{GeometryChange, GridSurface};
use gridboard_core::{
    DisplayNode, GridOptions, IdGenerator, LayoutTree, NodeId, WidgetNode, WidgetOptions,
    display_tree, first_fit,
};

/// Side effect handed back to the caller after processing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// An export snapshot to offer as a download.
    Export(ExportArtifact),
}

/// The dashboard state machine: canonical tree, command slot, selection,
/// and the canvas surface, owned per dashboard session.
#[derive(Debug)]
pub struct Reconciler<S: GridSurface> {
    tree: LayoutTree,
    slot: CommandSlot,
    selection: Selection,
    surface: S,
    ids: IdGenerator,
    grid: GridOptions,
    snapshot: Vec<WidgetNode>,
    pending_resync: bool,
}

impl<S: GridSurface> Reconciler<S> {
    /// An empty engine bound to `surface`.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            tree: LayoutTree::new(),
            slot: CommandSlot::new(),
            selection: Selection::new(),
            surface,
            ids: IdGenerator::new(),
            grid: GridOptions::default(),
            snapshot: Vec::new(),
            pending_resync: false,
        }
    }

    /// Override the grid configuration.
    #[must_use]
    pub fn with_grid(mut self, grid: GridOptions) -> Self {
        self.grid = grid;
        self
    }

    /// Seed the id generator (deterministic tests).
    #[must_use]
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.ids = IdGenerator::with_seed(seed);
        self
    }

    /// The bound surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The canonical tree (read-only; mutation goes through commands).
    #[must_use]
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    // ── Command intake ──────────────────────────────────────────────────

    /// Enqueue a command (last write wins).
    pub fn enqueue(&mut self, command: Command) {
        self.slot.enqueue(command);
    }

    /// The unclaimed pending command, if any.
    #[must_use]
    pub fn pending_command(&self) -> Option<&Command> {
        self.slot.pending()
    }

    /// Drop any pending command without processing it (page leave).
    pub fn clear_pending(&mut self) {
        self.slot.clear();
    }

    /// Claim and apply the pending command. Returns the command's
    /// effect, if it produced one. No pending command is a no-op.
    pub fn process(&mut self) -> Option<Effect> {
        let command = self.slot.take()?;
        tracing::debug!(command = command.kind(), "processing command");
        match command {
            Command::AddWidget(options) => {
                self.add_widget(options);
                None
            }
            Command::RemoveWidget(id) => {
                self.remove_widget(&id);
                None
            }
            Command::MoveWidget {
                node,
                target_parent,
            } => {
                self.move_widget(&node, target_parent.as_ref());
                None
            }
            Command::LoadLayout(items) => {
                self.load_layout(items);
                None
            }
            Command::ExportLayout => Some(Effect::Export(self.export())),
        }
    }

    /// [`process`](Self::process) followed by an immediate
    /// [`settle`](Self::settle), for hosts without a surface completion
    /// signal.
    pub fn process_and_settle(&mut self) -> Option<Effect> {
        let effect = self.process();
        self.settle();
        effect
    }

    // ── Deferred resync ─────────────────────────────────────────────────

    /// Whether a structural change is waiting to be re-serialized.
    #[must_use]
    pub fn has_pending_resync(&self) -> bool {
        self.pending_resync
    }

    /// Re-derive the serialized snapshot after the surface has settled.
    pub fn settle(&mut self) {
        if self.pending_resync {
            self.snapshot = self.tree.serialize();
            self.pending_resync = false;
        }
    }

    /// The last settled serialization of the tree. This is what the
    /// side panel and the persistence layer read.
    #[must_use]
    pub fn snapshot(&self) -> &[WidgetNode] {
        &self.snapshot
    }

    /// Label-bearing projection of the snapshot for the side panel.
    #[must_use]
    pub fn display_tree(&self) -> Vec<DisplayNode> {
        display_tree(&self.snapshot)
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select a node (highlight + scroll into view) or clear with
    /// `None`. A stale id clears the selection instead of keeping a
    /// dead reference.
    pub fn select(&mut self, id: Option<NodeId>) {
        match id {
            Some(id) if self.tree.contains(&id) => {
                self.surface.highlight(Some(&id));
                self.selection.set(Some(id));
            }
            Some(id) => {
                tracing::warn!(id = %id, "select: unknown node id; clearing selection");
                self.selection.clear();
                self.surface.highlight(None);
            }
            None => {
                self.selection.clear();
                self.surface.highlight(None);
            }
        }
    }

    /// The selected node id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&NodeId> {
        self.selection.current()
    }

    /// Serialize just the subtree rooted at the selection. `None` when
    /// nothing is selected or the id no longer resolves.
    #[must_use]
    pub fn serialize_selection(&self) -> Option<Vec<WidgetNode>> {
        let id = self.selection.current()?;
        let node = self.tree.find(id)?;
        Some(vec![node.clone()])
    }

    // ── Surface-driven geometry ─────────────────────────────────────────

    /// Apply native drag/drop/resize results reported by the canvas.
    pub fn apply_geometry_changes(&mut self, changes: &[GeometryChange]) {
        let mut touched = false;
        for change in changes {
            match self.tree.find_mut(&change.id) {
                Some(node) => {
                    node.x = change.x;
                    node.y = change.y;
                    node.w = change.w;
                    node.h = change.h;
                    touched = true;
                }
                None => {
                    tracing::warn!(id = %change.id, "geometry change for unknown node; skipped");
                }
            }
        }
        if touched {
            self.pending_resync = true;
        }
    }

    // ── Command semantics ───────────────────────────────────────────────

    fn add_widget(&mut self, options: WidgetOptions) {
        let occupied = self.tree.occupied(None);
        let node = options.into_node(&mut self.ids, &occupied, &self.grid);
        mount_subtree(&mut self.surface, None, &node);
        self.tree
            .insert(None, node)
            .expect("root insert is infallible");
        self.pending_resync = true;
    }

    fn remove_widget(&mut self, id: &NodeId) {
        if !self.tree.contains(id) {
            tracing::debug!(id = %id, "remove: id not present; no-op");
            return;
        }
        let teardown = self.tree.teardown_order(id);
        for node_id in &teardown {
            self.surface.unmount(node_id);
        }
        self.tree.detach(id);
        if self.selection.invalidate(&teardown) {
            self.surface.highlight(None);
        }
        self.pending_resync = true;
    }

    fn move_widget(&mut self, id: &NodeId, target: Option<&NodeId>) {
        if self.tree.find(id).is_none() {
            tracing::warn!(id = %id, "move: node not found; no-op");
            return;
        }
        if let Some(target_id) = target {
            match self.tree.find(target_id) {
                None => {
                    tracing::warn!(target = %target_id, "move: target not found; no-op");
                    return;
                }
                Some(node) if !node.is_container() => {
                    tracing::warn!(target = %target_id, "move: target has no nested grid; no-op");
                    return;
                }
                Some(_) => {}
            }
            if target_id == id || self.tree.is_descendant(id, target_id) {
                tracing::warn!(
                    id = %id,
                    target = %target_id,
                    "move: cannot attach a node under its own subtree; no-op"
                );
                return;
            }
        }

        // Old bindings go down with the structural step, children first;
        // the destination gets fresh bindings rather than adopted ones.
        let teardown = self.tree.teardown_order(id);
        for node_id in &teardown {
            self.surface.unmount(node_id);
        }

        let mut node = self
            .tree
            .detach(id)
            .expect("presence checked before detach");

        // Coordinates from the source grid are meaningless at the
        // destination; let it auto-place.
        let occupied = self.tree.occupied(target);
        let (x, y) = first_fit(&occupied, node.w, node.h, self.grid.columns);
        node.x = x;
        node.y = y;

        mount_subtree(&mut self.surface, target, &node);
        self.tree
            .insert(target, node)
            .expect("target validated as container before detach");
        self.pending_resync = true;
    }

    fn load_layout(&mut self, items: Vec<WidgetOptions>) {
        // Full teardown before reconstruction: no binding from the old
        // layout may survive into the new one.
        self.surface.clear();
        self.selection.clear();
        self.surface.highlight(None);

        let mut rects = Vec::new();
        let mut nodes = Vec::with_capacity(items.len());
        for options in items {
            let node = options.into_node(&mut self.ids, &rects, &self.grid);
            rects.push(node.rect());
            nodes.push(node);
        }
        for node in &nodes {
            mount_subtree(&mut self.surface, None, node);
        }
        self.tree.replace(nodes);
        self.pending_resync = true;
    }

    fn export(&self) -> ExportArtifact {
        let items = self.tree.serialize();
        let json = serde_json::to_string_pretty(&items)
            .expect("wire serialization has no failing states");
        ExportArtifact { json }
    }
}

fn mount_subtree<S: GridSurface>(surface: &mut S, parent: Option<&NodeId>, node: &WidgetNode) {
    surface.mount(parent, node);
    if let Some(children) = node.children() {
        for child in children {
            mount_subtree(surface, Some(&node.id), child);
        }
    }
}
