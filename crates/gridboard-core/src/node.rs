//! Widget node model and wire format.
//!
//! A [`WidgetNode`] is a positioned rectangle on a grid. It is either a
//! leaf or a container hosting a nested sub-grid of child nodes; the
//! distinction is a tagged variant ([`NodeKind`]) so exhaustive handling
//! is checkable, not an optional-field convention.
//!
//! # Wire format
//!
//! Nodes serialize to the flat shape the canvas and the export file use:
//!
//! ```json
//! { "id": "widget-1", "x": 0, "y": 0, "w": 4, "h": 4,
//!   "content": "Regular Widget",
//!   "children": [ ... ] }
//! ```
//!
//! `children` is present if and only if the node is a container. A
//! container with zero children serializes with `"children": []`; the
//! empty list is what keeps it a valid drop target after a round trip.
//!
//! # Invariants
//!
//! 1. **Round-trip fidelity**: serialize → deserialize preserves ids,
//!    positions, content, and the leaf/container distinction exactly.
//! 2. **Container identity**: an empty container never collapses into a
//!    leaf on either side of the conversion.
//! 3. Node ids are unique across an entire tree; uniqueness is enforced
//!    by the tree index, not by this type (see [`crate::tree`]).

use crate::placement::CellRect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a node within a layout tree.
///
/// Ids address nodes across all nesting levels, so they must be unique
/// across the whole tree, not just among siblings. Generated ids use the
/// `widget-<timestamp>-<random>` shape from [`crate::id::IdGenerator`];
/// loaded data may carry arbitrary strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Leaf vs container distinction.
///
/// A container's own on-canvas rectangle is separate from the grid formed
/// by its children; the children live in the container's sub-grid with
/// their own coordinate origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// No nested grid.
    Leaf,
    /// Hosts a nested sub-grid. May be empty (still a drop target).
    Container {
        /// Ordered child nodes of the sub-grid.
        children: Vec<WidgetNode>,
    },
}

/// A positioned rectangle on a grid, leaf or container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireNode", into = "WireNode")]
pub struct WidgetNode {
    /// Globally unique id within the tree.
    pub id: NodeId,
    /// Grid-cell column of the left edge.
    pub x: u32,
    /// Grid-cell row of the top edge.
    pub y: u32,
    /// Width in cells (positive).
    pub w: u32,
    /// Height in cells (positive).
    pub h: u32,
    /// Display payload: free text or a type tag resolved by the render
    /// dispatcher (see [`crate::render`]).
    pub content: Option<String>,
    /// Leaf or container.
    pub kind: NodeKind,
}

impl WidgetNode {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(id: impl Into<NodeId>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            content: None,
            kind: NodeKind::Leaf,
        }
    }

    /// Create a container node with the given children.
    #[must_use]
    pub fn container(
        id: impl Into<NodeId>,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        children: Vec<WidgetNode>,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            content: None,
            kind: NodeKind::Container { children },
        }
    }

    /// Set the display payload.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Whether this node hosts a nested sub-grid.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container { .. })
    }

    /// Child nodes, or `None` for a leaf. An empty container returns
    /// `Some(&[])`, not `None`.
    #[must_use]
    pub fn children(&self) -> Option<&[WidgetNode]> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Container { children } => Some(children),
        }
    }

    /// Mutable child list, or `None` for a leaf.
    pub fn children_mut(&mut self) -> Option<&mut Vec<WidgetNode>> {
        match &mut self.kind {
            NodeKind::Leaf => None,
            NodeKind::Container { children } => Some(children),
        }
    }

    /// The node's on-canvas cell rectangle.
    #[must_use]
    pub fn rect(&self) -> CellRect {
        CellRect::new(self.x, self.y, self.w, self.h)
    }

    /// Number of nodes in this subtree, including self.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(WidgetNode::subtree_len).sum())
            .unwrap_or(0)
    }
}

/// Serde mirror of [`WidgetNode`] in the flat wire shape.
#[derive(Serialize, Deserialize)]
struct WireNode {
    id: NodeId,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<WireNode>>,
}

impl From<WireNode> for WidgetNode {
    fn from(wire: WireNode) -> Self {
        let kind = match wire.children {
            None => NodeKind::Leaf,
            Some(children) => NodeKind::Container {
                children: children.into_iter().map(WidgetNode::from).collect(),
            },
        };
        Self {
            id: wire.id,
            x: wire.x,
            y: wire.y,
            w: wire.w,
            h: wire.h,
            content: wire.content,
            kind,
        }
    }
}

impl From<WidgetNode> for WireNode {
    fn from(node: WidgetNode) -> Self {
        let children = match node.kind {
            NodeKind::Leaf => None,
            NodeKind::Container { children } => {
                Some(children.into_iter().map(WireNode::from).collect())
            }
        };
        Self {
            id: node.id,
            x: node.x,
            y: node.y,
            w: node.w,
            h: node.h,
            content: node.content,
            children,
        }
    }
}
