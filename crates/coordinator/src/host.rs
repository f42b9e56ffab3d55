use crate::Indicator;
use async_trait::async_trait;
use messages::Message;
use store::TabId;
use thiserror::Error;
use url::Url;

/// Failure classes a host operation can produce. `TabGone` is the one
/// class the coordinator detects and suppresses; everything else is
/// logged and the operation continues best-effort.
#[derive(Debug, Error)]
pub enum HostError {
    /// The target tab closed or navigated away mid-operation.
    #[error("tab is gone: {0}")]
    TabGone(String),
    /// A privileged capability was not granted. Surfaced to the
    /// settings surface, never retried automatically.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("{0}")]
    Other(String),
}

impl HostError {
    pub fn is_tab_gone(&self) -> bool {
        matches!(self, Self::TabGone(_))
    }
}

/// Everything the coordinator needs from the browser host, as one
/// asynchronous collaborator seam. Production backs this with the real
/// extension APIs; tests back it with a scripted double.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Point-to-point message to the tab's live page scripts, returning
    /// the script's reply if it produced one.
    async fn send_message(
        &self,
        tab: TabId,
        message: Message,
    ) -> Result<Option<Message>, HostError>;

    /// Install the page scripts and styles into the tab.
    async fn inject(&self, tab: TabId) -> Result<(), HostError>;

    /// Push icon and title for the tab's visual indicator.
    async fn set_indicator(&self, tab: TabId, indicator: Indicator) -> Result<(), HostError>;

    /// Resolve a tab's current URL.
    async fn tab_url(&self, tab: TabId) -> Result<Url, HostError>;

    /// Whether the URL forbids script injection entirely.
    fn is_restricted(&self, url: &Url) -> bool {
        is_restricted_url(url)
    }

    async fn query_permission(&self, permission: &str) -> Result<bool, HostError>;

    /// Capture the visible area of the last focused window as an image.
    async fn capture_screenshot(&self) -> Result<Vec<u8>, HostError>;

    /// Hand a captured image to the host's download machinery.
    async fn download(&self, bytes: Vec<u8>, filename: &str) -> Result<(), HostError>;
}

/// The standard restricted-URL predicate: internal browser pages,
/// extension gallery pages and local files never get scripts injected.
pub fn is_restricted_url(url: &Url) -> bool {
    match url.scheme() {
        "http" | "https" => {}
        _ => return true,
    }
    matches!(
        url.host_str(),
        Some("chromewebstore.google.com" | "chrome.google.com" | "addons.mozilla.org" |
             "microsoftedge.microsoft.com")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn internal_pages_and_files_are_restricted() {
        assert!(is_restricted_url(&url("chrome://settings")));
        assert!(is_restricted_url(&url("about:blank")));
        assert!(is_restricted_url(&url("file:///home/user/page.html")));
        assert!(is_restricted_url(&url("chrome-extension://abc/popup.html")));
    }

    #[test]
    fn gallery_pages_are_restricted() {
        assert!(is_restricted_url(&url(
            "https://chromewebstore.google.com/detail/x"
        )));
        assert!(is_restricted_url(&url("https://addons.mozilla.org/firefox")));
    }

    #[test]
    fn ordinary_web_pages_are_not() {
        assert!(!is_restricted_url(&url("https://example.com/docs")));
        assert!(!is_restricted_url(&url("http://localhost:8080/")));
    }
}
