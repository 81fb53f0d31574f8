//! Side-panel projection of the widget tree.
//!
//! The tree view wants labels, not geometry: every node gets a
//! human-readable name derived from its content (HTML-stripped, since
//! payloads may carry markup) with fallbacks, and containers stay
//! expandable even when empty so they remain valid drop targets.

use crate::node::{NodeId, WidgetNode};
use serde::Serialize;

/// Fallback name when content strips down to nothing.
const UNTITLED: &str = "Untitled Widget";

/// A labeled node for the side-panel tree view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    /// Same id as the underlying widget node.
    pub id: NodeId,
    /// Human-readable label.
    pub name: String,
    /// `Some` (possibly empty) for containers, `None` for leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DisplayNode>>,
}

impl DisplayNode {
    /// Whether the tree view should offer an expand toggle and accept
    /// drops. True for every container, including empty ones.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.children.is_some()
    }
}

/// Project serialized items into display nodes, recursively.
#[must_use]
pub fn display_tree(items: &[WidgetNode]) -> Vec<DisplayNode> {
    items
        .iter()
        .map(|node| DisplayNode {
            id: node.id.clone(),
            name: display_name(node),
            children: node.children().map(display_tree),
        })
        .collect()
}

fn display_name(node: &WidgetNode) -> String {
    match &node.content {
        None => format!("Widget {}", node.id),
        Some(content) => {
            let stripped = strip_tags(content);
            let trimmed = stripped.trim();
            if trimmed.is_empty() {
                UNTITLED.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

/// Drop `<...>` tag spans from a content payload.
///
/// Payloads are occasionally raw HTML snippets; the label only wants the
/// text. An unterminated `<` swallows the rest of the string, which
/// matches treating it as a malformed tag.
#[must_use]
pub fn strip_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_tag = false;
    for ch in content.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_come_from_content() {
        let nodes = [WidgetNode::leaf("a", 0, 0, 1, 1).with_content("Revenue")];
        assert_eq!(display_tree(&nodes)[0].name, "Revenue");
    }

    #[test]
    fn html_is_stripped_from_names() {
        let nodes = [WidgetNode::leaf("a", 0, 0, 1, 1).with_content("<b>Sales</b> <i>Q3</i>")];
        assert_eq!(display_tree(&nodes)[0].name, "Sales Q3");
    }

    #[test]
    fn missing_content_falls_back_to_widget_id() {
        let nodes = [WidgetNode::leaf("widget-9", 0, 0, 1, 1)];
        assert_eq!(display_tree(&nodes)[0].name, "Widget widget-9");
    }

    #[test]
    fn markup_only_content_becomes_untitled() {
        let nodes = [WidgetNode::leaf("a", 0, 0, 1, 1).with_content("<div></div>")];
        assert_eq!(display_tree(&nodes)[0].name, UNTITLED);
    }

    #[test]
    fn empty_container_is_still_expandable() {
        let nodes = [WidgetNode::container("c", 0, 0, 2, 2, Vec::new())];
        let display = display_tree(&nodes);
        assert!(display[0].is_expandable());
        assert_eq!(display[0].children.as_deref(), Some(&[][..]));
    }

    #[test]
    fn projection_preserves_nesting() {
        let nodes = [WidgetNode::container(
            "c",
            0,
            0,
            4,
            4,
            vec![WidgetNode::leaf("n", 0, 0, 1, 1).with_content("Nested 1")],
        )];
        let display = display_tree(&nodes);
        assert_eq!(display[0].children.as_ref().unwrap()[0].name, "Nested 1");
    }
}
