//! The closed catalogue of messages exchanged between the coordinator,
//! the page-resident engines, and the settings surface.
//!
//! Every receiver matches exhaustively; payloads outside the catalogue
//! never get past deserialization, and a recognized-but-foreign message
//! is answered with [`Message::NotHandled`] rather than silently eaten.

use serde::{Deserialize, Serialize};
use store::{BorderStyle, TabId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Message {
    /// Liveness probe; answered with [`Message::Pong`] by injected pages.
    Ping,
    Pong {
        status: String,
    },

    // Coordinator -> page
    UpdateBorderMode {
        is_enabled: bool,
    },
    UpdateInspectorMode {
        is_enabled: bool,
    },
    UpdateBorderSettings {
        border_size: f32,
        border_style: BorderStyle,
    },

    // Page -> coordinator queries and their replies
    GetTabId,
    TabIdReply {
        tab_id: TabId,
    },
    GetBorderMode,
    GetInspectorMode,
    ModeReply {
        is_enabled: bool,
    },

    // Settings surface -> coordinator
    ToggleBorderMode {
        tab_id: Option<TabId>,
    },
    ToggleInspectorMode {
        tab_id: Option<TabId>,
    },
    CaptureScreenshot,

    /// Receiver-side signal that a message was recognized as valid but
    /// is not handled in that context.
    NotHandled,
}

impl Message {
    pub fn pong() -> Self {
        Self::Pong {
            status: String::from("ok"),
        }
    }
}
