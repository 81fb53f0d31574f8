//! Persisted record types and the page-tree projection.
//!
//! [`LayoutRecord`] is a named, immutable snapshot of a widget tree;
//! [`PageRecord`] is a navigation entry in its own folder tree,
//! optionally bound to a layout through `grid_id`. The two trees are
//! unrelated: pages nest by `parent_id`, widgets nest inside the
//! layout items.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use gridboard_core::WidgetNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a saved layout.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(String);

impl LayoutId {
    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayoutId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LayoutId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Thumbnail image bytes, base64-encoded for JSON safety.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thumbnail(String);

impl Thumbnail {
    /// Encode raw image bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(BASE64.encode(bytes))
    }

    /// The encoded form.
    #[must_use]
    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Decode back to raw bytes; `None` if the stored string is not
    /// valid base64 (hand-edited store file).
    #[must_use]
    pub fn decode(&self) -> Option<Vec<u8>> {
        BASE64.decode(&self.0).ok()
    }
}

/// A named, persisted snapshot of the full widget tree.
///
/// Created by an explicit Save, destroyed by an explicit delete, and
/// immutable in between except through an explicit update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// Generated `layout-…` id.
    pub id: LayoutId,
    /// User-facing name.
    pub name: String,
    /// The serialized widget tree, nested children included.
    pub items: Vec<WidgetNode>,
    /// Optional preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    /// Unix-millis of the last save or update.
    pub updated_at: u64,
}

/// Whether a page is a navigable entry or a grouping folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// A navigable page; may reference a layout.
    Page,
    /// A grouping folder in the nav tree.
    Folder,
}

/// A navigation entry, organized in its own folder tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page id.
    pub id: PageId,
    /// Display name.
    pub name: String,
    /// Route path (e.g. `/analytics`); what layout saves match on.
    pub path: String,
    /// Hidden pages stay in the tree but are flagged out of the nav.
    pub visible: bool,
    /// Page vs folder.
    #[serde(rename = "type")]
    pub kind: PageKind,
    /// Parent folder; `None` for a root entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,
    /// The layout shown when this page is opened. May dangle after a
    /// layout delete; the loader treats that as "no layout".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<LayoutId>,
    /// Sibling ordering; unordered pages sort last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Icon name resolved by the host's icon catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A page with its child pages attached, for the nav sidebar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageTreeNode {
    /// The page itself.
    #[serde(flatten)]
    pub page: PageRecord,
    /// Child pages, ordered.
    pub children: Vec<PageTreeNode>,
}

/// Group flat page records into the nav tree.
///
/// Roots are pages without a `parent_id`; siblings sort by `order`
/// (unordered last) then name. A page whose `parent_id` points at no
/// known page is dropped from the projection, matching the flat list
/// staying authoritative.
#[must_use]
pub fn page_tree(pages: &[PageRecord]) -> Vec<PageTreeNode> {
    fn build(page: &PageRecord, pages: &[PageRecord]) -> PageTreeNode {
        let mut children: Vec<&PageRecord> = pages
            .iter()
            .filter(|p| p.parent_id.as_ref() == Some(&page.id))
            .collect();
        sort_siblings(&mut children);
        PageTreeNode {
            page: page.clone(),
            children: children.into_iter().map(|c| build(c, pages)).collect(),
        }
    }

    for page in pages {
        if let Some(parent) = &page.parent_id
            && !pages.iter().any(|p| &p.id == parent)
        {
            tracing::debug!(page = %page.id, parent = %parent, "page parent missing; dropped from tree");
        }
    }

    let mut roots: Vec<&PageRecord> = pages.iter().filter(|p| p.parent_id.is_none()).collect();
    sort_siblings(&mut roots);
    roots.into_iter().map(|p| build(p, pages)).collect()
}

fn sort_siblings(pages: &mut [&PageRecord]) {
    pages.sort_by(|a, b| {
        let ka = (a.order.unwrap_or(u32::MAX), a.name.as_str());
        let kb = (b.order.unwrap_or(u32::MAX), b.name.as_str());
        ka.cmp(&kb)
    });
}
