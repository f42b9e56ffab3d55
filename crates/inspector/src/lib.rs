//! Facade over the element-inspector workspace: per-tab outline and
//! box-model overlay engines, the write-through tab state store, and
//! the coordinator that keeps all three consistent across tab
//! navigation, activation and popup toggles.

pub use coordinator::{is_restricted_url, Coordinator, HostError, Indicator, TabHost};
pub use dom::{Document, DomUpdate, ElementMetrics, NodeKey, Rect, UI_MARKER_ATTR};
pub use messages::Message;
pub use outline::OutlineEngine;
pub use overlay::{BoxModelGeometry, OverlayEngine, TooltipContent};
pub use page::PageSession;
pub use store::{
    BorderSettings, BorderStyle, JsonFileBackend, MemoryBackend, StorageBackend, TabId, TabState,
    TabStatePatch, TabStateStore,
};

pub mod test_support;
