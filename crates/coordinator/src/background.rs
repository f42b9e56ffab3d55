use crate::host::{HostError, TabHost};
use crate::indicator::Indicator;
use log::{debug, error, trace, warn};
use messages::Message;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use store::{BorderSettings, TabId, TabState, TabStatePatch, TabStateStore};
use url::Url;

enum ToggleTarget {
    Border,
    Inspector,
}

pub struct Coordinator {
    store: TabStateStore,
    host: Arc<dyn TabHost>,
    /// Tab of the last focused window; popup toggles without an
    /// explicit tab target land here.
    last_focused: Option<TabId>,
}

impl Coordinator {
    pub fn new(store: TabStateStore, host: Arc<dyn TabHost>) -> Self {
        Self {
            store,
            host,
            last_focused: None,
        }
    }

    pub fn last_focused(&self) -> Option<TabId> {
        self.last_focused
    }

    pub fn store_mut(&mut self) -> &mut TabStateStore {
        &mut self.store
    }

    /// The one orchestration path behind every toggle, load, activation
    /// and keyboard command. Steps run strictly in order; every failure
    /// is handled here — logged, never propagated, never retried.
    #[tracing::instrument(skip(self))]
    pub async fn apply_state_change(
        &mut self,
        tab: TabId,
        url: &Url,
        patch: Option<TabStatePatch>,
    ) -> TabState {
        // Restricted pages are decided before any other action.
        if self.host.is_restricted(url) {
            debug!("{tab}: restricted url {url}, skipping injection");
            self.push_indicator(tab, Indicator::Restricted).await;
            return self.store.get(tab).await;
        }

        self.ensure_injected(tab).await;

        let state = match patch {
            Some(patch) => self.store.set(tab, patch).await,
            None => self.store.get(tab).await,
        };

        self.push_indicator(tab, Indicator::resolve(false, state)).await;
        self.broadcast(tab, state).await;
        state
    }

    /// Liveness probe, then injection only when nothing answers.
    async fn ensure_injected(&self, tab: TabId) {
        match self.host.send_message(tab, Message::Ping).await {
            Ok(Some(Message::Pong { .. })) => {
                trace!("{tab}: page scripts already live");
                return;
            }
            Ok(reply) => debug!("{tab}: no pong ({reply:?}), injecting"),
            Err(err) if err.is_tab_gone() => {
                warn!("{tab}: gone during liveness probe: {err}");
                return;
            }
            Err(err) => debug!("{tab}: probe failed ({err}), injecting"),
        }
        if let Err(err) = self.host.inject(tab).await {
            log_host_failure("inject", tab, &err);
        }
    }

    async fn push_indicator(&self, tab: TabId, indicator: Indicator) {
        if let Err(err) = self.host.set_indicator(tab, indicator).await {
            log_host_failure("set indicator", tab, &err);
        }
    }

    /// Push the tab's state and the global settings as independent
    /// point-to-point sends; one failed delivery never blocks the rest.
    async fn broadcast(&self, tab: TabId, state: TabState) {
        let settings = self.store.border_settings().await;
        let sends = [
            Message::UpdateBorderMode {
                is_enabled: state.border_mode,
            },
            Message::UpdateInspectorMode {
                is_enabled: state.inspector_mode,
            },
            Message::UpdateBorderSettings {
                border_size: settings.size,
                border_style: settings.style,
            },
        ];
        for message in sends {
            if let Err(err) = self.host.send_message(tab, message).await {
                log_host_failure("broadcast", tab, &err);
            }
        }
    }

    async fn toggle(&mut self, target: ToggleTarget, tab: Option<TabId>) -> Option<Message> {
        let Some(tab) = tab.or(self.last_focused) else {
            warn!("toggle without a target tab and no focused tab known");
            return None;
        };
        let url = match self.host.tab_url(tab).await {
            Ok(url) => url,
            Err(err) => {
                log_host_failure("resolve url", tab, &err);
                return None;
            }
        };
        let current = self.store.get(tab).await;
        let patch = match target {
            ToggleTarget::Border => TabStatePatch::border(!current.border_mode),
            ToggleTarget::Inspector => TabStatePatch::inspector(!current.inspector_mode),
        };
        let state = self.apply_state_change(tab, &url, Some(patch)).await;
        let is_enabled = match target {
            ToggleTarget::Border => state.border_mode,
            ToggleTarget::Inspector => state.inspector_mode,
        };
        Some(Message::ModeReply { is_enabled })
    }

    /// Dispatch one inbound message from a page or the settings
    /// surface. The only error that crosses back to the caller is
    /// [`HostError::PermissionDenied`], so the settings surface can
    /// prompt; everything else is logged and swallowed here.
    pub async fn handle_message(
        &mut self,
        sender: Option<TabId>,
        message: Message,
    ) -> Result<Option<Message>, HostError> {
        match message {
            Message::ToggleBorderMode { tab_id } => {
                Ok(self.toggle(ToggleTarget::Border, tab_id).await)
            }
            Message::ToggleInspectorMode { tab_id } => {
                Ok(self.toggle(ToggleTarget::Inspector, tab_id).await)
            }
            Message::UpdateBorderSettings {
                border_size,
                border_style,
            } => {
                let settings = BorderSettings::new(border_size, border_style);
                self.store.set_border_settings(settings).await;
                self.push_settings_to_focused(settings).await;
                Ok(None)
            }
            Message::GetTabId => Ok(Some(match sender {
                Some(tab_id) => Message::TabIdReply { tab_id },
                None => Message::NotHandled,
            })),
            Message::GetBorderMode => match sender {
                Some(tab) => {
                    let state = self.store.get(tab).await;
                    Ok(Some(Message::ModeReply {
                        is_enabled: state.border_mode,
                    }))
                }
                None => Ok(Some(Message::NotHandled)),
            },
            Message::GetInspectorMode => match sender {
                Some(tab) => {
                    let state = self.store.get(tab).await;
                    Ok(Some(Message::ModeReply {
                        is_enabled: state.inspector_mode,
                    }))
                }
                None => Ok(Some(Message::NotHandled)),
            },
            Message::CaptureScreenshot => {
                self.capture_screenshot().await?;
                Ok(None)
            }
            Message::NotHandled => Ok(None),
            Message::Ping
            | Message::Pong { .. }
            | Message::UpdateBorderMode { .. }
            | Message::UpdateInspectorMode { .. }
            | Message::TabIdReply { .. }
            | Message::ModeReply { .. } => {
                trace!("message not for the coordinator: {message:?}");
                Ok(Some(Message::NotHandled))
            }
        }
    }

    /// Settings changes reach the focused tab immediately, but only
    /// when its border mode is actually on.
    async fn push_settings_to_focused(&mut self, settings: BorderSettings) {
        let Some(tab) = self.last_focused else {
            return;
        };
        let state = self.store.get(tab).await;
        if !state.border_mode {
            return;
        }
        let message = Message::UpdateBorderSettings {
            border_size: settings.size,
            border_style: settings.style,
        };
        if let Err(err) = self.host.send_message(tab, message).await {
            log_host_failure("settings push", tab, &err);
        }
    }

    async fn capture_screenshot(&self) -> Result<(), HostError> {
        let granted = match self.host.query_permission("downloads").await {
            Ok(granted) => granted,
            Err(err) => {
                error!("permission query failed: {err}");
                false
            }
        };
        if !granted {
            return Err(HostError::PermissionDenied(String::from("downloads")));
        }
        let bytes = match self.host.capture_screenshot().await {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("screenshot capture failed: {err}");
                return Ok(());
            }
        };
        let filename = format!("inspector-{}.png", epoch_seconds());
        match self.host.download(bytes, &filename).await {
            Ok(()) => Ok(()),
            Err(err @ HostError::PermissionDenied(_)) => Err(err),
            Err(err) => {
                error!("screenshot download failed: {err}");
                Ok(())
            }
        }
    }

    /// Tab finished loading; re-establish its state in the page.
    pub async fn on_tab_loaded(&mut self, tab: TabId, url: &Url) {
        self.apply_state_change(tab, url, None).await;
    }

    pub async fn on_tab_activated(&mut self, tab: TabId, url: &Url) {
        self.last_focused = Some(tab);
        self.apply_state_change(tab, url, None).await;
    }

    /// Tab closed: evict. There is no transition back from here.
    pub async fn on_tab_removed(&mut self, tab: TabId) {
        if self.last_focused == Some(tab) {
            self.last_focused = None;
        }
        self.store.evict(tab).await;
    }
}

fn log_host_failure(operation: &str, tab: TabId, err: &HostError) {
    if err.is_tab_gone() {
        warn!("{tab}: {operation} hit a vanished tab: {err}");
    } else {
        error!("{tab}: {operation} failed: {err}");
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
