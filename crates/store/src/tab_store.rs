use crate::backend::StorageBackend;
use crate::settings::{BorderSettings, BorderStyle};
use crate::{TabId, TabState, TabStatePatch};
use log::{error, warn};
use std::collections::HashMap;
use std::sync::Arc;

const BORDER_SIZE_KEY: &str = "borderSize";
const BORDER_STYLE_KEY: &str = "borderStyle";

/// Write-through cache over the persistent store, keyed by tab.
///
/// Invariant: a populated cache entry always equals the last value read
/// from or written toward the backend for that tab. On a failed write
/// the cache keeps the optimistic value and diverges until the next
/// successful write; that gap is accepted and logged, never rolled back.
pub struct TabStateStore {
    cache: HashMap<TabId, TabState>,
    backend: Arc<dyn StorageBackend>,
}

impl TabStateStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            cache: HashMap::new(),
            backend,
        }
    }

    /// Resolve a tab's state: cache first, then backend, then default.
    /// The cache is populated with whatever this returns, including the
    /// default taken on a miss or a failed read.
    pub async fn get(&mut self, tab: TabId) -> TabState {
        if let Some(state) = self.cache.get(&tab) {
            return *state;
        }
        let state = match self.backend.read(&tab.storage_key()).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("{tab}: unreadable persisted state, using defaults: {err}");
                TabState::default()
            }),
            Ok(None) => TabState::default(),
            Err(err) => {
                error!("{tab}: state read failed, using defaults: {err}");
                TabState::default()
            }
        };
        self.cache.insert(tab, state);
        state
    }

    /// Shallow-merge `patch` into the tab's state, cache the result,
    /// then persist it. The cache keeps the merged value even when the
    /// write fails.
    pub async fn set(&mut self, tab: TabId, patch: TabStatePatch) -> TabState {
        let merged = self.get(tab).await.merged(patch);
        self.cache.insert(tab, merged);
        match serde_json::to_string(&merged) {
            Ok(raw) => {
                if let Err(err) = self.backend.write(&tab.storage_key(), &raw).await {
                    error!("{tab}: state write failed, cache keeps optimistic value: {err}");
                }
            }
            Err(err) => error!("{tab}: state serialize failed: {err}"),
        }
        merged
    }

    /// Forget a closed tab. Backend removal is best-effort.
    pub async fn evict(&mut self, tab: TabId) {
        self.cache.remove(&tab);
        if let Err(err) = self.backend.remove(&tab.storage_key()).await {
            warn!("{tab}: state removal failed: {err}");
        }
    }

    /// Global outline settings; falls back to defaults field by field.
    pub async fn border_settings(&self) -> BorderSettings {
        let size = match self.backend.read(BORDER_SIZE_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or(BorderSettings::default().size),
            Ok(None) => BorderSettings::default().size,
            Err(err) => {
                error!("border size read failed, using default: {err}");
                BorderSettings::default().size
            }
        };
        let style = match self.backend.read(BORDER_STYLE_KEY).await {
            Ok(Some(raw)) => raw
                .trim_matches('"')
                .parse::<BorderStyle>()
                .unwrap_or_default(),
            Ok(None) => BorderStyle::default(),
            Err(err) => {
                error!("border style read failed, using default: {err}");
                BorderStyle::default()
            }
        };
        BorderSettings::new(size, style)
    }

    pub async fn set_border_settings(&self, settings: BorderSettings) {
        let settings = BorderSettings::new(settings.size, settings.style);
        if let Err(err) = self
            .backend
            .write(BORDER_SIZE_KEY, &settings.size.to_string())
            .await
        {
            error!("border size write failed: {err}");
        }
        if let Err(err) = self
            .backend
            .write(BORDER_STYLE_KEY, settings.style.as_css())
            .await
        {
            error!("border style write failed: {err}");
        }
    }
}
