//! Structural mutation commands and the single-slot queue.
//!
//! Any UI surface (side-panel tree, toolbar, delete buttons on the
//! canvas) requests structural changes by enqueueing a [`Command`]; only
//! the reconciliation engine consumes them. The queue is a single slot
//! with last-write-wins semantics: commands arrive at human interaction
//! frequency and processing is immediate, so depth-one is enough. But
//! a rapid double enqueue before consumption does drop the first
//! command. That race is part of the contract and is tested.
//!
//! # Invariants
//!
//! 1. **At most once**: a claimed command is cleared atomically with the
//!    claim; re-processing an already-claimed command is impossible.
//! 2. **Last write wins**: enqueueing over a pending command replaces
//!    it; the displaced command is logged and dropped.

use gridboard_core::{NodeId, WidgetOptions};

/// File name of the export artifact.
pub const EXPORT_FILE_NAME: &str = "grid-layout.json";

/// A single structural mutation request.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Insert a new node (leaf or container, nested payload allowed),
    /// auto-placing and minting ids for whatever the options omit.
    AddWidget(WidgetOptions),
    /// Delete a node and its entire subtree. No-op if absent.
    RemoveWidget(NodeId),
    /// Relocate a node (subtree intact) under `target_parent`, or to
    /// the root grid when `target_parent` is `None`.
    MoveWidget {
        /// The node to relocate.
        node: NodeId,
        /// Destination container, or `None` for the root grid.
        target_parent: Option<NodeId>,
    },
    /// Wholesale replace the tree with the given items.
    LoadLayout(Vec<WidgetOptions>),
    /// Produce a downloadable snapshot of the full tree. Read-only.
    ExportLayout,
}

impl Command {
    /// Short name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddWidget(_) => "ADD_WIDGET",
            Self::RemoveWidget(_) => "REMOVE_WIDGET",
            Self::MoveWidget { .. } => "MOVE_WIDGET",
            Self::LoadLayout(_) => "LOAD_LAYOUT",
            Self::ExportLayout => "EXPORT_LAYOUT",
        }
    }
}

/// The downloadable result of [`Command::ExportLayout`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Pretty-printed JSON of the full tree.
    pub json: String,
}

impl ExportArtifact {
    /// Suggested download file name.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        EXPORT_FILE_NAME
    }
}

/// Single-slot command inbox.
#[derive(Debug, Default)]
pub struct CommandSlot {
    pending: Option<Command>,
}

impl CommandSlot {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a command in the slot, displacing any pending one.
    pub fn enqueue(&mut self, command: Command) {
        if let Some(displaced) = self.pending.replace(command) {
            tracing::debug!(
                displaced = displaced.kind(),
                "pending command displaced before processing"
            );
        }
    }

    /// Claim the pending command, clearing the slot in the same step.
    pub fn take(&mut self) -> Option<Command> {
        self.pending.take()
    }

    /// The pending command, if any, without claiming it.
    #[must_use]
    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    /// Drop any pending command without processing it.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
