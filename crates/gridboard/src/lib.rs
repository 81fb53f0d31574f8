#![forbid(unsafe_code)]

//! Gridboard public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts
//! embedding the dashboard core. It re-exports the model, engine, and
//! store types, offers a lightweight prelude, and ships
//! [`DashboardSession`], one dashboard instance with its canvas and
//! storage collaborators injected.

use std::fmt;

pub mod session;

pub use session::DashboardSession;

// --- Core re-exports -------------------------------------------------------

pub use gridboard_core::{
    CellRect, DisplayNode, GridOptions, IdGenerator, InsertError, LayoutTree, NodeId, NodeKind,
    RenderKind, WidgetNode, WidgetOptions, display_tree, first_fit, strip_tags,
};

// --- Engine re-exports -----------------------------------------------------

pub use gridboard_engine::{
    Command, CommandSlot, EXPORT_FILE_NAME, Effect, ExportArtifact, GeometryChange, GridSurface,
    HeadlessSurface, Reconciler, Selection, SurfaceEvent,
};

// --- Store re-exports ------------------------------------------------------

pub use gridboard_store::{
    FileStorage, LayoutId, LayoutRecord, LayoutStore, MemoryStorage, Notifier, NullNotifier,
    PageId, PageKind, PageRecord, PageTreeNode, Severity, StorageBackend, StorageError,
    StorageResult, StoreData, Thumbnail, page_tree,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gridboard hosts.
#[derive(Debug)]
pub enum Error {
    /// Persistence failure (already surfaced to the user via the
    /// store's notifier).
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

/// Standard result type for gridboard APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    //! Day-to-day imports for dashboard hosts.
    pub use crate::{
        Command, DashboardSession, Error, FileStorage, GridSurface, HeadlessSurface, LayoutStore,
        MemoryStorage, NodeId, Reconciler, Result, WidgetNode, WidgetOptions,
    };
}
