//! The canonical layout tree and its id index.
//!
//! [`LayoutTree`] owns the nested node structure and a side index from
//! id to tree path, so node resolution never depends on a rendering
//! layer being mounted or up to date. All queries are pure; structural
//! mutation happens through [`detach`](LayoutTree::detach) /
//! [`insert`](LayoutTree::insert) / [`replace`](LayoutTree::replace),
//! which rebuild the index.
//!
//! # Invariants
//!
//! 1. The index always agrees with the node structure (rebuilt on every
//!    mutation; trees are interactively sized, so a full DFS rebuild is
//!    cheap).
//! 2. Duplicate ids in loaded data are not canonicalized: the first
//!    occurrence in depth-first order wins all lookups, and the
//!    duplicate is logged. Mutating around duplicates is undefined in
//!    the same way lookups are.
//! 3. `detach` returns the node with its entire subtree intact.

use crate::node::{NodeId, WidgetNode};
use crate::placement::CellRect;
use std::collections::HashMap;
use std::fmt;

/// Child-index path from the root list to a node.
type NodePath = Vec<usize>;

/// Error from [`LayoutTree::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The requested parent id resolves to no node.
    ParentNotFound(NodeId),
    /// The requested parent exists but has no nested grid.
    ParentNotContainer(NodeId),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentNotFound(id) => write!(f, "parent node {id} not found"),
            Self::ParentNotContainer(id) => write!(f, "node {id} has no nested grid"),
        }
    }
}

impl std::error::Error for InsertError {}

/// The nested widget structure with an id→path index.
#[derive(Debug, Default)]
pub struct LayoutTree {
    roots: Vec<WidgetNode>,
    index: HashMap<NodeId, NodePath>,
}

impl LayoutTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from canonical items (a loaded layout).
    #[must_use]
    pub fn from_items(items: Vec<WidgetNode>) -> Self {
        let mut tree = Self {
            roots: items,
            index: HashMap::new(),
        };
        tree.reindex();
        tree
    }

    /// Root-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[WidgetNode] {
        &self.roots
    }

    /// Total node count across all levels.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(WidgetNode::subtree_len).sum()
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `id` resolves to a node.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Depth-first lookup; the first occurrence of a duplicated id wins.
    #[must_use]
    pub fn find(&self, id: &NodeId) -> Option<&WidgetNode> {
        let path = self.index.get(id)?;
        self.node_at(path)
    }

    /// Mutable lookup.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut WidgetNode> {
        let path = self.index.get(id)?.clone();
        self.node_at_mut(&path)
    }

    /// The parent of `id`: `None` if the id is unknown, `Some(None)` for
    /// a root-level node, `Some(Some(parent))` otherwise.
    #[must_use]
    pub fn parent_of(&self, id: &NodeId) -> Option<Option<NodeId>> {
        let path = self.index.get(id)?;
        if path.len() == 1 {
            return Some(None);
        }
        let parent = self.node_at(&path[..path.len() - 1])?;
        Some(Some(parent.id.clone()))
    }

    /// Children at a grid level: the root list for `None`, a container's
    /// child list otherwise. `None` result means the parent is missing
    /// or a leaf.
    #[must_use]
    pub fn children_of(&self, parent: Option<&NodeId>) -> Option<&[WidgetNode]> {
        match parent {
            None => Some(self.roots.as_slice()),
            Some(id) => self.find(id)?.children(),
        }
    }

    /// Sibling rects at a grid level, for first-fit placement.
    #[must_use]
    pub fn occupied(&self, parent: Option<&NodeId>) -> Vec<CellRect> {
        self.children_of(parent)
            .map(|nodes| nodes.iter().map(WidgetNode::rect).collect())
            .unwrap_or_default()
    }

    /// Whether `id` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant(&self, ancestor: &NodeId, id: &NodeId) -> bool {
        let (Some(a), Some(b)) = (self.index.get(ancestor), self.index.get(id)) else {
            return false;
        };
        b.len() > a.len() && b[..a.len()] == a[..]
    }

    /// Ids of the subtree rooted at `id`, parents before children.
    #[must_use]
    pub fn subtree_ids(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.find(id) {
            collect_pre_order(node, &mut out);
        }
        out
    }

    /// Ids of the subtree rooted at `id`, children before parents: the
    /// order render bindings must be torn down in.
    #[must_use]
    pub fn teardown_order(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.find(id) {
            collect_post_order(node, &mut out);
        }
        out
    }

    /// How many nodes in the tree carry `id`. Scans the structure rather
    /// than the index, so duplicates are visible.
    #[must_use]
    pub fn count_occurrences(&self, id: &NodeId) -> usize {
        fn count(node: &WidgetNode, id: &NodeId) -> usize {
            let own = usize::from(&node.id == id);
            own + node
                .children()
                .map(|c| c.iter().map(|n| count(n, id)).sum())
                .unwrap_or(0)
        }
        self.roots.iter().map(|n| count(n, id)).sum()
    }

    /// Remove `id` and return it with its subtree intact. `None` if the
    /// id is unknown.
    pub fn detach(&mut self, id: &NodeId) -> Option<WidgetNode> {
        let path = self.index.get(id)?.clone();
        let (last, parent_path) = path.split_last()?;
        let node = if parent_path.is_empty() {
            self.roots.remove(*last)
        } else {
            self.node_at_mut(parent_path)?
                .children_mut()?
                .remove(*last)
        };
        self.reindex();
        Some(node)
    }

    /// Insert `node` at a grid level: the root list for `None`, a
    /// container's child list otherwise.
    pub fn insert(&mut self, parent: Option<&NodeId>, node: WidgetNode) -> Result<(), InsertError> {
        match parent {
            None => self.roots.push(node),
            Some(id) => {
                let Some(target) = self.find_mut(id) else {
                    return Err(InsertError::ParentNotFound(id.clone()));
                };
                let Some(children) = target.children_mut() else {
                    return Err(InsertError::ParentNotContainer(id.clone()));
                };
                children.push(node);
            }
        }
        self.reindex();
        Ok(())
    }

    /// Replace the whole tree with new items.
    pub fn replace(&mut self, items: Vec<WidgetNode>) {
        self.roots = items;
        self.reindex();
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.roots.clear();
        self.index.clear();
    }

    /// Clone the tree into its wire form.
    #[must_use]
    pub fn serialize(&self) -> Vec<WidgetNode> {
        self.roots.clone()
    }

    fn node_at(&self, path: &[usize]) -> Option<&WidgetNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for idx in rest {
            node = node.children()?.get(*idx)?;
        }
        Some(node)
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut WidgetNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for idx in rest {
            node = node.children_mut()?.get_mut(*idx)?;
        }
        Some(node)
    }

    fn reindex(&mut self) {
        self.index.clear();
        let mut path = Vec::new();
        for (i, node) in self.roots.iter().enumerate() {
            path.push(i);
            index_node(node, &mut path, &mut self.index);
            path.pop();
        }
    }
}

fn index_node(node: &WidgetNode, path: &mut NodePath, index: &mut HashMap<NodeId, NodePath>) {
    if index.contains_key(&node.id) {
        tracing::warn!(id = %node.id, "duplicate node id in layout; first occurrence wins");
    } else {
        index.insert(node.id.clone(), path.clone());
    }
    if let Some(children) = node.children() {
        for (i, child) in children.iter().enumerate() {
            path.push(i);
            index_node(child, path, index);
            path.pop();
        }
    }
}

fn collect_pre_order(node: &WidgetNode, out: &mut Vec<NodeId>) {
    out.push(node.id.clone());
    if let Some(children) = node.children() {
        for child in children {
            collect_pre_order(child, out);
        }
    }
}

fn collect_post_order(node: &WidgetNode, out: &mut Vec<NodeId>) {
    if let Some(children) = node.children() {
        for child in children {
            collect_post_order(child, out);
        }
    }
    out.push(node.id.clone());
}
