//! Scripted host double for exercising the coordinator against real
//! page sessions, without a browser.

use async_trait::async_trait;
use coordinator::{HostError, Indicator, TabHost};
use messages::Message;
use page::PageSession;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use store::TabId;
use tokio::sync::Mutex;
use url::Url;

/// Stable name for a message kind, used to script per-kind failures.
pub fn action_tag(message: &Message) -> &'static str {
    match message {
        Message::Ping => "PING",
        Message::Pong { .. } => "PONG",
        Message::UpdateBorderMode { .. } => "UPDATE_BORDER_MODE",
        Message::UpdateInspectorMode { .. } => "UPDATE_INSPECTOR_MODE",
        Message::UpdateBorderSettings { .. } => "UPDATE_BORDER_SETTINGS",
        Message::GetTabId => "GET_TAB_ID",
        Message::TabIdReply { .. } => "TAB_ID_REPLY",
        Message::GetBorderMode => "GET_BORDER_MODE",
        Message::GetInspectorMode => "GET_INSPECTOR_MODE",
        Message::ModeReply { .. } => "MODE_REPLY",
        Message::ToggleBorderMode { .. } => "TOGGLE_BORDER_MODE",
        Message::ToggleInspectorMode { .. } => "TOGGLE_INSPECTOR_MODE",
        Message::CaptureScreenshot => "CAPTURE_SCREENSHOT",
        Message::NotHandled => "NOT_HANDLED",
    }
}

/// In-process browser double: tracks tab URLs, owns one real
/// [`PageSession`] per injected tab, records every indicator push and
/// message send, and can script tab-gone and per-message failures.
#[derive(Default)]
pub struct MockHost {
    urls: Mutex<HashMap<TabId, Url>>,
    pages: Mutex<HashMap<TabId, PageSession>>,
    gone: Mutex<HashSet<TabId>>,
    failing_sends: Mutex<HashSet<&'static str>>,
    indicators: Mutex<HashMap<TabId, Indicator>>,
    inject_counts: Mutex<HashMap<TabId, u64>>,
    sent: Mutex<Vec<(TabId, Message)>>,
    permission_granted: AtomicBool,
    downloads: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        let host = Self::default();
        host.permission_granted.store(true, Ordering::Relaxed);
        host
    }

    pub async fn add_tab(&self, tab: TabId, url: &str) {
        let parsed = Url::parse(url).expect("test url must parse");
        self.urls.lock().await.insert(tab, parsed);
    }

    /// Make every further operation against this tab fail as TabGone.
    pub async fn mark_gone(&self, tab: TabId) {
        self.gone.lock().await.insert(tab);
    }

    /// Script delivery failure for one message kind (by action tag).
    pub async fn fail_sends_of(&self, tag: &'static str) {
        self.failing_sends.lock().await.insert(tag);
    }

    pub fn grant_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::Relaxed);
    }

    pub async fn indicator(&self, tab: TabId) -> Option<Indicator> {
        self.indicators.lock().await.get(&tab).copied()
    }

    pub async fn inject_count(&self, tab: TabId) -> u64 {
        self.inject_counts.lock().await.get(&tab).copied().unwrap_or(0)
    }

    pub async fn sent_tags(&self, tab: TabId) -> Vec<&'static str> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(target, _)| *target == tab)
            .map(|(_, message)| action_tag(message))
            .collect()
    }

    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.lock().await.clone()
    }

    pub async fn has_page(&self, tab: TabId) -> bool {
        self.pages.lock().await.contains_key(&tab)
    }

    /// Run assertions or mutations against a tab's live page session.
    pub async fn with_page<R>(
        &self,
        tab: TabId,
        operate: impl FnOnce(&mut PageSession) -> R,
    ) -> Option<R> {
        self.pages.lock().await.get_mut(&tab).map(operate)
    }

    async fn check_gone(&self, tab: TabId) -> Result<(), HostError> {
        if self.gone.lock().await.contains(&tab) {
            return Err(HostError::TabGone(format!("no tab with id {}", tab.0)));
        }
        Ok(())
    }
}

#[async_trait]
impl TabHost for MockHost {
    async fn send_message(
        &self,
        tab: TabId,
        message: Message,
    ) -> Result<Option<Message>, HostError> {
        self.check_gone(tab).await?;
        if self.failing_sends.lock().await.contains(action_tag(&message)) {
            return Err(HostError::Other(format!(
                "scripted failure delivering {}",
                action_tag(&message)
            )));
        }
        self.sent.lock().await.push((tab, message.clone()));
        let mut pages = self.pages.lock().await;
        match pages.get_mut(&tab) {
            Some(session) => Ok(session.handle_message(message)),
            // No live scripts: delivery reaches nobody.
            None => Ok(None),
        }
    }

    async fn inject(&self, tab: TabId) -> Result<(), HostError> {
        self.check_gone(tab).await?;
        *self.inject_counts.lock().await.entry(tab).or_insert(0) += 1;
        self.pages
            .lock()
            .await
            .entry(tab)
            .or_insert_with(|| PageSession::new((1280.0, 720.0)));
        Ok(())
    }

    async fn set_indicator(&self, tab: TabId, indicator: Indicator) -> Result<(), HostError> {
        self.check_gone(tab).await?;
        self.indicators.lock().await.insert(tab, indicator);
        Ok(())
    }

    async fn tab_url(&self, tab: TabId) -> Result<Url, HostError> {
        self.check_gone(tab).await?;
        self.urls
            .lock()
            .await
            .get(&tab)
            .cloned()
            .ok_or_else(|| HostError::TabGone(format!("no tab with id {}", tab.0)))
    }

    async fn query_permission(&self, _permission: &str) -> Result<bool, HostError> {
        Ok(self.permission_granted.load(Ordering::Relaxed))
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>, HostError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn download(&self, _bytes: Vec<u8>, filename: &str) -> Result<(), HostError> {
        self.downloads.lock().await.push(filename.to_owned());
        Ok(())
    }
}
