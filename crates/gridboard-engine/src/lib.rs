#![forbid(unsafe_code)]

//! Grid reconciliation engine for gridboard.
//!
//! This crate keeps three things consistent: the canonical widget tree
//! (`gridboard-core`), the canvas surface's render bindings, and the
//! serialized snapshot that downstream views read. External UI never
//! mutates the tree; it enqueues a [`Command`] into the single-slot
//! queue, and the [`Reconciler`] claims and applies it exactly once.
//!
//! # Key Components
//!
//! - [`Command`] / [`CommandSlot`] - the mutation request channel
//! - [`Reconciler`] - the state machine applying commands
//! - [`GridSurface`] - render-binding collaborator trait
//! - [`HeadlessSurface`] - journaling in-memory surface
//! - [`Selection`] - shared active-node state

pub mod command;
pub mod engine;
pub mod selection;
pub mod surface;

pub use command::{Command, CommandSlot, EXPORT_FILE_NAME, ExportArtifact};
pub use engine::{Effect, Reconciler};
pub use selection::Selection;
pub use surface::{GeometryChange, GridSurface, HeadlessSurface, SurfaceEvent};
