//! The canvas surface protocol.
//!
//! [`GridSurface`] is the engine's view of the drag-and-drop canvas: a
//! collaborator that owns one live render binding per mounted node and
//! mirrors selection highlights. The engine drives it with plain
//! per-node calls and walks subtrees itself, so implementations stay
//! dumb: no tree knowledge required.
//!
//! # Invariants
//!
//! 1. `mount` is called parents-before-children; `unmount`
//!    children-before-parents. A container's binding never outlives a
//!    child binding (remove) and never precedes one (mount).
//! 2. `unmount` happens synchronously with the structural step that
//!    removes or relocates the node; render resources must not leak
//!    past the mutation that invalidated them.
//! 3. A move re-creates bindings fresh at the destination; the engine
//!    never asks a surface to adopt a binding across grid levels.
//! 4. Geometry changes flow the other way: native drag/drop/resize is
//!    reported as [`GeometryChange`] batches and applied to the tree by
//!    the engine alone.

use gridboard_core::{NodeId, WidgetNode};
use std::collections::BTreeSet;

/// Updated cell geometry for one node, reported by the canvas after a
/// native drag/drop/resize gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeometryChange {
    /// The moved or resized node.
    pub id: NodeId,
    /// New column.
    pub x: u32,
    /// New row.
    pub y: u32,
    /// New width in cells.
    pub w: u32,
    /// New height in cells.
    pub h: u32,
}

/// Render-binding collaborator for a canvas surface.
pub trait GridSurface {
    /// Create the render binding for `node` under `parent` (`None` for
    /// the root grid). Called once per node, parents first.
    fn mount(&mut self, parent: Option<&NodeId>, node: &WidgetNode);

    /// Tear down the render binding for `id`. Called once per node,
    /// children first.
    fn unmount(&mut self, id: &NodeId);

    /// Tear down every binding at once (layout replace).
    fn clear(&mut self);

    /// Highlight the given node and scroll it into view; `None` clears
    /// all highlights.
    fn highlight(&mut self, id: Option<&NodeId>);
}

/// One observed surface call, for assertions on ordering and balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// `mount` was called.
    Mounted {
        /// The mounted node.
        id: NodeId,
        /// Its parent grid (`None` = root).
        parent: Option<NodeId>,
    },
    /// `unmount` was called.
    Unmounted {
        /// The node torn down.
        id: NodeId,
    },
    /// `clear` was called.
    Cleared,
    /// `highlight` was called.
    Highlighted {
        /// The highlighted node, or `None` for clear-all.
        id: Option<NodeId>,
    },
}

/// In-memory surface double: tracks mounted bindings and journals every
/// call. Used by the engine's own tests and by hosts that want a
/// headless dashboard (server-side rendering, integration tests).
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    mounted: BTreeSet<NodeId>,
    journal: Vec<SurfaceEvent>,
}

impl HeadlessSurface {
    /// An empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a binding currently exists for `id`.
    #[must_use]
    pub fn is_mounted(&self, id: &NodeId) -> bool {
        self.mounted.contains(id)
    }

    /// Ids with live bindings, in sorted order.
    #[must_use]
    pub fn mounted(&self) -> Vec<NodeId> {
        self.mounted.iter().cloned().collect()
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn journal(&self) -> &[SurfaceEvent] {
        &self.journal
    }

    /// Forget the journal (not the bindings).
    pub fn reset_journal(&mut self) {
        self.journal.clear();
    }
}

impl GridSurface for HeadlessSurface {
    fn mount(&mut self, parent: Option<&NodeId>, node: &WidgetNode) {
        self.mounted.insert(node.id.clone());
        self.journal.push(SurfaceEvent::Mounted {
            id: node.id.clone(),
            parent: parent.cloned(),
        });
    }

    fn unmount(&mut self, id: &NodeId) {
        if !self.mounted.remove(id) {
            tracing::warn!(id = %id, "unmount without a live binding");
        }
        self.journal.push(SurfaceEvent::Unmounted { id: id.clone() });
    }

    fn clear(&mut self) {
        self.mounted.clear();
        self.journal.push(SurfaceEvent::Cleared);
    }

    fn highlight(&mut self, id: Option<&NodeId>) {
        self.journal.push(SurfaceEvent::Highlighted { id: id.cloned() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_surface_tracks_bindings() {
        let mut surface = HeadlessSurface::new();
        let node = WidgetNode::leaf("a", 0, 0, 1, 1);
        surface.mount(None, &node);
        assert!(surface.is_mounted(&"a".into()));
        surface.unmount(&"a".into());
        assert!(!surface.is_mounted(&"a".into()));
        assert_eq!(surface.journal().len(), 2);
    }

    #[test]
    fn clear_drops_every_binding() {
        let mut surface = HeadlessSurface::new();
        surface.mount(None, &WidgetNode::leaf("a", 0, 0, 1, 1));
        surface.mount(None, &WidgetNode::leaf("b", 1, 0, 1, 1));
        surface.clear();
        assert!(surface.mounted().is_empty());
    }
}
