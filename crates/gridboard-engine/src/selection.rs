//! Selected-node tracking.
//!
//! One node id (or none) is shared between the canvas highlight and the
//! side-panel tree. The struct is pure state; the engine mirrors every
//! change to the surface and clears the selection when the
//! selected node is removed or the whole layout is replaced, so a stale
//! id never escapes.

use gridboard_core::NodeId;

/// The shared "active node" state.
#[derive(Debug, Default)]
pub struct Selection {
    current: Option<NodeId>,
}

impl Selection {
    /// Nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected id, if any.
    #[must_use]
    pub fn current(&self) -> Option<&NodeId> {
        self.current.as_ref()
    }

    /// Replace the selection.
    pub fn set(&mut self, id: Option<NodeId>) {
        self.current = id;
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Clear the selection if it points at one of `removed`. Returns
    /// true when the selection was dropped.
    pub fn invalidate(&mut self, removed: &[NodeId]) -> bool {
        match &self.current {
            Some(id) if removed.contains(id) => {
                tracing::debug!(id = %id, "selection cleared: node removed");
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
