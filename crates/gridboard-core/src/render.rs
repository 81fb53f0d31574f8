//! Render dispatch for widget payloads.
//!
//! A widget's `content` is either free text or one of a small set of
//! type tags; the canvas host resolves the tag to an actual chart
//! component. Unknown tags and plain text both render as text, so the
//! dispatcher never fails.

use crate::node::WidgetNode;

/// Kinds the canvas host knows how to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderKind {
    /// Bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Pie chart.
    Pie,
    /// Tabular data.
    Table,
    /// Image payload.
    Image,
    /// Plain text (the fallback).
    Text,
}

impl RenderKind {
    /// Resolve a known type tag; `None` for anything else.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "pie" => Some(Self::Pie),
            "table" => Some(Self::Table),
            "image" => Some(Self::Image),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Dispatch a node: a content payload that is exactly a known tag
    /// selects that kind; everything else (free text, markup, missing
    /// content) is text.
    #[must_use]
    pub fn for_node(node: &WidgetNode) -> Self {
        node.content
            .as_deref()
            .and_then(Self::from_tag)
            .unwrap_or(Self::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_dispatch_to_their_kind() {
        let node = WidgetNode::leaf("a", 0, 0, 1, 1).with_content("pie");
        assert_eq!(RenderKind::for_node(&node), RenderKind::Pie);
    }

    #[test]
    fn free_text_and_unknown_tags_fall_back_to_text() {
        let prose = WidgetNode::leaf("a", 0, 0, 1, 1).with_content("Quarterly numbers");
        let unknown = WidgetNode::leaf("b", 0, 0, 1, 1).with_content("hologram");
        let empty = WidgetNode::leaf("c", 0, 0, 1, 1);
        assert_eq!(RenderKind::for_node(&prose), RenderKind::Text);
        assert_eq!(RenderKind::for_node(&unknown), RenderKind::Text);
        assert_eq!(RenderKind::for_node(&empty), RenderKind::Text);
    }
}
