use crate::lyrics::remote::RemoteSettings;
use crate::sync::{PointerKind, ScrollStrategy, SyncTimings};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// User-editable configuration (ReadOnly by App after load)
/// stored in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub keys: crate::app::keys::KeyConfig,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub pointer: PointerKind,
    /// Unset means "whatever suits the pointer".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_strategy: Option<ScrollStrategy>,
    /// Use the album's own lines even when the sync store answers "none".
    #[serde(default)]
    pub embedded_fallback_on_absent: bool,
    #[serde(default)]
    pub timings: SyncTimings,
    #[serde(default)]
    pub store: StoreSettings,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            keys: crate::app::keys::KeyConfig::default(),
            api_base_url: default_api_base_url(),
            lang: default_lang(),
            pointer: PointerKind::default(),
            // Terminal scrolling is row-by-row, so the eased animation
            // reads better than a jump.
            scroll_strategy: Some(ScrollStrategy::Eased),
            embedded_fallback_on_absent: false,
            timings: SyncTimings::default(),
            store: StoreSettings::default(),
        }
    }
}

impl UserConfig {
    /// Parses `config.toml`, falling back to defaults on a broken file.
    pub fn parse(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "invalid config.toml, using defaults");
                Self::default()
            }
        }
    }

    pub fn validated(mut self) -> Self {
        self.timings = self.timings.validated();
        if self.lang.trim().is_empty() {
            self.lang = default_lang();
        }
        self
    }

    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            base_url: self.api_base_url.trim_end_matches('/').to_string(),
            cache_ttl: Duration::from_millis(self.store.cache_ttl_ms),
            request_gap: Duration::from_millis(self.store.request_gap_ms),
            timeout: Duration::from_millis(self.store.timeout_ms),
        }
    }
}

/// HTTP store tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub cache_ttl_ms: u64,
    pub request_gap_ms: u64,
    pub timeout_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 300_000,
            request_gap_ms: 500,
            timeout_ms: 10_000,
        }
    }
}
