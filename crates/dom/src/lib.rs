#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]

pub mod document;
pub mod feed;
pub mod geometry;

pub use document::{Document, DomNode, NodeKind, UI_MARKER_ATTR};
pub use feed::{DomFeed, DomSubscriber, DomUpdate, pump_feed};
pub use geometry::{Edges, ElementMetrics, Rect, Rgba};

/// Stable identity of a node, independent of arena slot reuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    pub const ROOT: Self = Self(0);
}

impl core::fmt::Display for NodeKey {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}
