//! Partial widget descriptions and their normalization into placed nodes.
//!
//! [`WidgetOptions`] is the shape command payloads and hand-authored
//! imports arrive in: every field optional, nested children allowed.
//! Normalization fills the gaps (a generated id, a first-fit position,
//! a 1x1 minimum size) and produces a canonical [`WidgetNode`]. Fields
//! that are present are kept as-is, so canonical data round-trips
//! through options without loss.

use crate::id::IdGenerator;
use crate::node::{NodeId, NodeKind, WidgetNode};
use crate::placement::{CellRect, GridOptions, first_fit};
use serde::{Deserialize, Serialize};

/// A widget description with every field optional.
///
/// The presence of `children` (even an empty list) makes the normalized
/// node a container.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    /// Explicit id; minted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    /// Explicit column; auto-placed when absent or overlapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    /// Explicit row; auto-placed when absent or overlapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    /// Width in cells; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    /// Height in cells; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    /// Display payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Nested children; `Some` marks the node as a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<WidgetOptions>>,
}

impl WidgetOptions {
    /// Empty options: normalizes to a 1×1 auto-placed leaf.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an explicit position.
    #[must_use]
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the size.
    #[must_use]
    pub fn sized(mut self, w: u32, h: u32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    /// Set the display payload.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Mark as a container with the given children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<WidgetOptions>) -> Self {
        self.children = Some(children);
        self
    }

    /// Mark as an empty container.
    #[must_use]
    pub fn container(mut self) -> Self {
        self.children = Some(Vec::new());
        self
    }

    /// Normalize into a placed node.
    ///
    /// `occupied` holds the sibling rects at the destination level; an
    /// explicit position that overlaps one of them is corrected to the
    /// first free slot, matching the placement-time-only validation
    /// rule. Children are normalized recursively against each other
    /// inside the container's own sub-grid.
    #[must_use]
    pub fn into_node(
        self,
        ids: &mut IdGenerator,
        occupied: &[CellRect],
        grid: &GridOptions,
    ) -> WidgetNode {
        let id = self.id.unwrap_or_else(|| ids.widget_id());
        let w = self.w.unwrap_or(1).clamp(1, grid.columns);
        let h = self.h.unwrap_or(1).max(1);
        let (x, y) = match (self.x, self.y) {
            (Some(x), Some(y)) => {
                let candidate = CellRect::new(x, y, w, h);
                if occupied.iter().any(|r| r.overlaps(&candidate)) {
                    first_fit(occupied, w, h, grid.columns)
                } else {
                    (x, y)
                }
            }
            _ => first_fit(occupied, w, h, grid.columns),
        };
        let kind = match self.children {
            None => NodeKind::Leaf,
            Some(children) => {
                let mut placed: Vec<WidgetNode> = Vec::with_capacity(children.len());
                let mut child_rects: Vec<CellRect> = Vec::with_capacity(children.len());
                for child in children {
                    let node = child.into_node(ids, &child_rects, grid);
                    child_rects.push(node.rect());
                    placed.push(node);
                }
                NodeKind::Container { children: placed }
            }
        };
        WidgetNode {
            id,
            x,
            y,
            w,
            h,
            content: self.content,
            kind,
        }
    }
}

impl From<WidgetNode> for WidgetOptions {
    /// Lossless downgrade: canonical nodes re-enter the command channel
    /// (layout loads) without losing ids, positions, or structure.
    fn from(node: WidgetNode) -> Self {
        Self {
            id: Some(node.id),
            x: Some(node.x),
            y: Some(node.y),
            w: Some(node.w),
            h: Some(node.h),
            content: node.content,
            children: match node.kind {
                NodeKind::Leaf => None,
                NodeKind::Container { children } => {
                    Some(children.into_iter().map(WidgetOptions::from).collect())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> IdGenerator {
        IdGenerator::with_seed(1)
    }

    #[test]
    fn bare_options_become_auto_placed_leaf() {
        let node = WidgetOptions::new().into_node(&mut ids(), &[], &GridOptions::default());
        assert!(!node.is_container());
        assert_eq!((node.x, node.y, node.w, node.h), (0, 0, 1, 1));
        assert!(node.id.as_str().starts_with("widget-"));
    }

    #[test]
    fn explicit_fields_are_kept() {
        let node = WidgetOptions::new()
            .with_id("widget-1")
            .at(2, 3)
            .sized(4, 4)
            .with_content("Regular Widget")
            .into_node(&mut ids(), &[], &GridOptions::default());
        assert_eq!(node.id.as_str(), "widget-1");
        assert_eq!((node.x, node.y, node.w, node.h), (2, 3, 4, 4));
        assert_eq!(node.content.as_deref(), Some("Regular Widget"));
    }

    #[test]
    fn overlapping_explicit_position_is_corrected() {
        let occupied = [CellRect::new(0, 0, 4, 4)];
        let node = WidgetOptions::new()
            .at(1, 1)
            .sized(2, 2)
            .into_node(&mut ids(), &occupied, &GridOptions::default());
        assert_eq!((node.x, node.y), (4, 0));
    }

    #[test]
    fn nested_children_are_placed_within_the_container() {
        let node = WidgetOptions::new()
            .sized(6, 6)
            .with_children(vec![
                WidgetOptions::new().sized(2, 2).with_content("Sub Item 1"),
                WidgetOptions::new().sized(2, 2).with_content("Sub Item 2"),
            ])
            .into_node(&mut ids(), &[], &GridOptions::default());
        let children = node.children().unwrap();
        assert_eq!(children.len(), 2);
        assert!(!children[0].rect().overlaps(&children[1].rect()));
    }

    #[test]
    fn empty_children_list_normalizes_to_empty_container() {
        let node = WidgetOptions::new()
            .container()
            .into_node(&mut ids(), &[], &GridOptions::default());
        assert_eq!(node.children(), Some(&[][..]));
    }

    #[test]
    fn node_to_options_round_trip_is_lossless() {
        let node = WidgetNode::container(
            "widget-container-1",
            4,
            0,
            8,
            6,
            vec![WidgetNode::leaf("nested-1", 0, 0, 3, 2).with_content("Nested 1")],
        );
        let back = WidgetOptions::from(node.clone()).into_node(
            &mut ids(),
            &[],
            &GridOptions::default(),
        );
        assert_eq!(back, node);
    }
}
