use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub mod persistence;
pub mod user;

pub use persistence::PersistentState;
pub use user::{StoreSettings, UserConfig};

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let xdg_dir = home.join(".config").join("lyricsync");

        // Ensure it exists
        if !xdg_dir.exists() {
            let _ = fs::create_dir_all(&xdg_dir);
        }

        xdg_dir
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_state_path() -> PathBuf {
        Self::get_config_dir().join("state.toml")
    }

    pub fn get_theme_path() -> PathBuf {
        Self::get_config_dir().join("theme.toml")
    }

    /// Load both. A missing `config.toml` is written with defaults.
    pub fn load() -> (UserConfig, PersistentState) {
        let config_path = Self::get_config_path();
        let state_path = Self::get_state_path();

        // 1. Load User Config
        let user_config = if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => UserConfig::parse(&content),
                Err(e) => {
                    warn!(error = %e, "could not read config.toml, using defaults");
                    UserConfig::default()
                }
            }
        } else {
            let c = UserConfig::default();
            if let Ok(content) = toml::to_string_pretty(&c) {
                let _ = fs::write(&config_path, content);
            }
            c
        };

        // 2. Load State
        let state = fs::read_to_string(&state_path)
            .ok()
            .and_then(|content| toml::from_str::<PersistentState>(&content).ok())
            .unwrap_or_default()
            .sanitized();

        (user_config.validated(), state)
    }
}
