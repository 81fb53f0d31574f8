#![forbid(unsafe_code)]

//! Layout and page persistence for gridboard.
//!
//! Translates between the live widget tree and durable records: named
//! layout snapshots and the navigation page tree that binds them to
//! routes. Storage is pluggable behind [`StorageBackend`]; failures
//! are caught at this boundary and surfaced as transient user
//! notifications, never as engine state corruption.
//!
//! # Key Components
//!
//! - [`LayoutRecord`] / [`PageRecord`] - the persisted record types
//! - [`StorageBackend`] - [`MemoryStorage`] and atomic-rename JSON
//!   [`FileStorage`]
//! - [`LayoutStore`] - the adapter: save/load/delete plus page
//!   bindings
//! - [`Notifier`] - transient notification sink for failures

pub mod backend;
pub mod records;
pub mod store;

pub use backend::{FileStorage, MemoryStorage, StorageBackend, StorageError, StorageResult, StoreData};
pub use records::{
    LayoutId, LayoutRecord, PageId, PageKind, PageRecord, PageTreeNode, Thumbnail, page_tree,
};
pub use store::{LayoutStore, Notifier, NullNotifier, Severity};
