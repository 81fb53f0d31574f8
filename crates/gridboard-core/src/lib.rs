#![forbid(unsafe_code)]

//! Core widget tree model for gridboard.
//!
//! This crate is the pure, rendering-agnostic half of the dashboard
//! builder: the nested node structure, its wire format, grid placement
//! math, and the projections other surfaces read. It knows nothing
//! about canvases, commands, or storage; those live in
//! `gridboard-engine` and `gridboard-store`.
//!
//! # Key Components
//!
//! - [`WidgetNode`] / [`NodeKind`] - a placed rectangle, leaf or container
//! - [`LayoutTree`] - the canonical tree plus an id→path index
//! - [`WidgetOptions`] - all-optional input shape, normalized on insert
//! - [`first_fit`] / [`GridOptions`] - row-major auto-placement
//! - [`display_tree`] - label-bearing projection for the side panel
//! - [`IdGenerator`] - `widget-<timestamp>-<random>` id minting

pub mod display;
pub mod id;
pub mod node;
pub mod options;
pub mod placement;
pub mod render;
pub mod tree;

pub use display::{DisplayNode, display_tree, strip_tags};
pub use id::{IdGenerator, unix_millis};
pub use node::{NodeId, NodeKind, WidgetNode};
pub use options::WidgetOptions;
pub use placement::{CellRect, GridOptions, first_fit};
pub use render::RenderKind;
pub use tree::{InsertError, LayoutTree};
