pub mod backend;
pub mod settings;
pub mod tab_store;

pub use backend::{JsonFileBackend, MemoryBackend, PersistenceError, StorageBackend};
pub use settings::{BorderSettings, BorderStyle, ParseBorderStyleError};
pub use tab_store::TabStateStore;

use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier. Opaque; the host controls allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl core::fmt::Display for TabId {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(formatter, "tab {}", self.0)
    }
}

impl TabId {
    /// The persistent-store key for this tab's state.
    pub fn storage_key(&self) -> String {
        self.0.to_string()
    }
}

/// Per-tab toggle state. Defaults to everything off on first access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabState {
    #[serde(rename = "borderMode")]
    pub border_mode: bool,
    #[serde(rename = "inspectorMode")]
    pub inspector_mode: bool,
}

impl TabState {
    pub fn is_active(&self) -> bool {
        self.border_mode || self.inspector_mode
    }

    /// Shallow-merge a partial update; absent fields keep their value.
    pub fn merged(&self, patch: TabStatePatch) -> Self {
        Self {
            border_mode: patch.border_mode.unwrap_or(self.border_mode),
            inspector_mode: patch.inspector_mode.unwrap_or(self.inspector_mode),
        }
    }
}

/// Partial [`TabState`], the unit of every state mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabStatePatch {
    pub border_mode: Option<bool>,
    pub inspector_mode: Option<bool>,
}

impl TabStatePatch {
    pub fn border(enabled: bool) -> Self {
        Self {
            border_mode: Some(enabled),
            ..Self::default()
        }
    }

    pub fn inspector(enabled: bool) -> Self {
        Self {
            inspector_mode: Some(enabled),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_untouched_fields() {
        let state = TabState {
            border_mode: false,
            inspector_mode: true,
        };
        let merged = state.merged(TabStatePatch::border(true));
        assert!(merged.border_mode);
        assert!(merged.inspector_mode);
    }

    #[test]
    fn empty_patch_is_identity() {
        let state = TabState {
            border_mode: true,
            inspector_mode: false,
        };
        assert_eq!(state.merged(TabStatePatch::default()), state);
    }

    #[test]
    fn wire_shape_matches_persisted_layout() {
        let json = serde_json::to_string(&TabState {
            border_mode: true,
            inspector_mode: false,
        })
        .unwrap();
        assert_eq!(json, r#"{"borderMode":true,"inspectorMode":false}"#);
    }
}
