//! Property-based invariant tests for the layout tree model.
//!
//! Invariants checked for arbitrary well-formed nested layouts:
//!
//! 1. The wire format round-trips losslessly (ids, positions, content,
//!    and the leaf/container distinction all preserved).
//! 2. Normalization never places overlapping siblings, at any level.
//! 3. Detach is subtree-complete: no id from the detached subtree
//!    remains findable, and every other id survives.
//! 4. The id index agrees with a structural scan for every node.

use gridboard_core::{
    CellRect, GridOptions, IdGenerator, LayoutTree, NodeId, WidgetNode, WidgetOptions,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn options_strategy() -> impl Strategy<Value = WidgetOptions> {
    let leaf = (1u32..=4, 1u32..=3, proptest::option::of("[a-z ]{0,12}")).prop_map(
        |(w, h, content)| {
            let mut opts = WidgetOptions::new().sized(w, h);
            if let Some(text) = content {
                opts = opts.with_content(text);
            }
            opts
        },
    );
    leaf.prop_recursive(3, 24, 4, |inner| {
        (1u32..=6, 1u32..=4, prop::collection::vec(inner, 0..4)).prop_map(|(w, h, children)| {
            WidgetOptions::new().sized(w, h).with_children(children)
        })
    })
}

fn layout_strategy() -> impl Strategy<Value = Vec<WidgetOptions>> {
    prop::collection::vec(options_strategy(), 0..5)
}

fn build_tree(options: Vec<WidgetOptions>) -> LayoutTree {
    let mut ids = IdGenerator::with_seed(11);
    let grid = GridOptions::default();
    let mut rects: Vec<CellRect> = Vec::new();
    let mut nodes: Vec<WidgetNode> = Vec::new();
    for opts in options {
        let node = opts.into_node(&mut ids, &rects, &grid);
        rects.push(node.rect());
        nodes.push(node);
    }
    LayoutTree::from_items(nodes)
}

fn all_ids(items: &[WidgetNode], out: &mut Vec<NodeId>) {
    for node in items {
        out.push(node.id.clone());
        if let Some(children) = node.children() {
            all_ids(children, out);
        }
    }
}

fn assert_no_sibling_overlap(items: &[WidgetNode]) {
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            assert!(
                !a.rect().overlaps(&b.rect()),
                "siblings {} and {} overlap",
                a.id,
                b.id
            );
        }
    }
    for node in items {
        if let Some(children) = node.children() {
            assert_no_sibling_overlap(children);
        }
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn wire_round_trip_is_lossless(options in layout_strategy()) {
        let items = build_tree(options).serialize();
        let json = serde_json::to_string(&items).unwrap();
        let back: Vec<WidgetNode> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, items);
    }

    #[test]
    fn normalization_never_overlaps_siblings(options in layout_strategy()) {
        let tree = build_tree(options);
        assert_no_sibling_overlap(tree.roots());
    }

    #[test]
    fn detach_is_subtree_complete(options in layout_strategy(), pick in any::<prop::sample::Index>()) {
        let mut tree = build_tree(options);
        let mut ids = Vec::new();
        all_ids(tree.roots(), &mut ids);
        prop_assume!(!ids.is_empty());

        let victim = ids[pick.index(ids.len())].clone();
        let removed = tree.subtree_ids(&victim);
        let detached = tree.detach(&victim).unwrap();
        prop_assert_eq!(detached.subtree_len(), removed.len());

        for id in &removed {
            prop_assert!(!tree.contains(id), "removed id {} still findable", id);
            prop_assert_eq!(tree.count_occurrences(id), 0);
        }
        for id in ids.iter().filter(|id| !removed.contains(id)) {
            prop_assert!(tree.contains(id), "unrelated id {} lost", id);
        }
    }

    #[test]
    fn index_agrees_with_structural_scan(options in layout_strategy()) {
        let tree = build_tree(options);
        let mut ids = Vec::new();
        all_ids(tree.roots(), &mut ids);
        for id in &ids {
            prop_assert!(tree.contains(id));
            prop_assert_eq!(&tree.find(id).unwrap().id, id);
            prop_assert_eq!(tree.count_occurrences(id), 1);
        }
        prop_assert_eq!(tree.node_count(), ids.len());
    }
}
