//! Page-resident runtime: one [`PageSession`] per injected tab, owning
//! the document plus both engines and dispatching inbound messages.

use anyhow::Error;
use dom::{Document, NodeKey};
use log::{error, trace};
use messages::Message;
use outline::OutlineEngine;
use overlay::OverlayEngine;
use store::BorderSettings;

pub struct PageSession {
    doc: Document,
    outline: OutlineEngine,
    overlay: OverlayEngine,
}

impl PageSession {
    pub fn new(viewport: (f32, f32)) -> Self {
        Self {
            doc: Document::new(),
            outline: OutlineEngine::new(BorderSettings::default()),
            overlay: OverlayEngine::new(viewport),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn outline(&self) -> &OutlineEngine {
        &self.outline
    }

    pub fn overlay(&self) -> &OverlayEngine {
        &self.overlay
    }

    /// Handle one inbound message, returning the reply if the message
    /// warrants one. Messages outside this context's share of the
    /// catalogue come back as [`Message::NotHandled`]; engine failures
    /// are logged here and never cross the message boundary.
    pub fn handle_message(&mut self, message: Message) -> Option<Message> {
        match message {
            Message::Ping => Some(Message::pong()),
            Message::UpdateBorderMode { is_enabled } => {
                if is_enabled {
                    self.outline.enable(&self.doc);
                } else {
                    self.outline.disable();
                }
                None
            }
            Message::UpdateInspectorMode { is_enabled } => {
                let result = if is_enabled {
                    self.overlay.enable(&mut self.doc)
                } else {
                    self.overlay.disable(&mut self.doc)
                };
                if let Err(err) = result {
                    error!("inspector mode update failed: {err}");
                }
                None
            }
            Message::UpdateBorderSettings {
                border_size,
                border_style,
            } => {
                self.outline
                    .update_settings(BorderSettings::new(border_size, border_style));
                None
            }
            Message::Pong { .. }
            | Message::GetTabId
            | Message::TabIdReply { .. }
            | Message::GetBorderMode
            | Message::GetInspectorMode
            | Message::ModeReply { .. }
            | Message::ToggleBorderMode { .. }
            | Message::ToggleInspectorMode { .. }
            | Message::CaptureScreenshot
            | Message::NotHandled => {
                trace!("message not for the page context: {message:?}");
                Some(Message::NotHandled)
            }
        }
    }

    /// One cooperative tick: deliver pending document changes to the
    /// outline engine and flush any trailing overlay reposition.
    pub fn tick(&mut self) -> Result<(), Error> {
        self.doc.flush();
        self.outline.pump()?;
        self.overlay.tick();
        Ok(())
    }

    pub fn pointer_enter(&mut self, node: NodeKey, cursor: (f32, f32)) {
        self.overlay.pointer_enter(&self.doc, node, cursor);
    }

    pub fn pointer_move(&mut self, cursor: (f32, f32)) {
        self.overlay.pointer_move(cursor);
    }

    pub fn pointer_leave(&mut self) {
        self.overlay.pointer_leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PageSession {
        let _ = env_logger::builder().is_test(true).try_init();
        PageSession::new((1280.0, 720.0))
    }

    #[test]
    fn ping_gets_a_pong() {
        let mut session = session();
        assert_eq!(session.handle_message(Message::Ping), Some(Message::pong()));
    }

    #[test]
    fn border_mode_round_trip() {
        let mut session = session();
        let div = session
            .doc_mut()
            .create_element(NodeKey::ROOT, "div")
            .unwrap();

        session.handle_message(Message::UpdateBorderMode { is_enabled: true });
        assert!(session.outline().is_enabled());
        assert!(session.outline().outline_of(div).is_some());

        session.handle_message(Message::UpdateBorderMode { is_enabled: false });
        assert!(!session.outline().is_enabled());
        assert!(session.outline().outline_of(div).is_none());
    }

    #[test]
    fn inspector_mode_builds_and_tears_down_the_scaffold() {
        let mut session = session();
        session.handle_message(Message::UpdateInspectorMode { is_enabled: true });
        assert!(session.overlay().is_enabled());

        session.handle_message(Message::UpdateInspectorMode { is_enabled: false });
        assert!(!session.overlay().is_enabled());
        assert!(session.doc().elements().is_empty());
    }

    #[test]
    fn settings_update_refreshes_live_outlines() {
        let mut session = session();
        let div = session
            .doc_mut()
            .create_element(NodeKey::ROOT, "div")
            .unwrap();
        session.handle_message(Message::UpdateBorderMode { is_enabled: true });
        session.handle_message(Message::UpdateBorderSettings {
            border_size: 2.0,
            border_style: store::BorderStyle::Dotted,
        });
        let outline = session.outline().outline_of(div).unwrap();
        assert_eq!(outline.size, 2.0);
        assert_eq!(outline.style, store::BorderStyle::Dotted);
    }

    #[test]
    fn foreign_messages_come_back_not_handled() {
        let mut session = session();
        assert_eq!(
            session.handle_message(Message::CaptureScreenshot),
            Some(Message::NotHandled)
        );
        assert_eq!(
            session.handle_message(Message::GetTabId),
            Some(Message::NotHandled)
        );
    }

    #[test]
    fn outline_survives_overlay_scaffold_construction() {
        let mut session = session();
        session.handle_message(Message::UpdateBorderMode { is_enabled: true });
        session.handle_message(Message::UpdateInspectorMode { is_enabled: true });
        session.tick().unwrap();
        // Scaffold elements are marked; none of them may be outlined.
        assert_eq!(session.outline().outlined_count(), 0);
    }
}
