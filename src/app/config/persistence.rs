use crate::player::RepeatMode;
use serde::{Deserialize, Serialize};
use std::fs;

/// Automatically saved session state
/// stored in `state.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub repeat: RepeatMode,
    #[serde(default)]
    pub shuffle: bool,
    /// Album manifest opened last time.
    #[serde(default)]
    pub last_album: Option<String>,
    #[serde(default)]
    pub last_track: Option<String>,
}

fn default_volume() -> u8 {
    50
}

impl Default for PersistentState {
    fn default() -> Self {
        Self {
            volume: 50,
            repeat: RepeatMode::None,
            shuffle: false,
            last_album: None,
            last_track: None,
        }
    }
}

impl PersistentState {
    pub fn sanitized(mut self) -> Self {
        self.volume = self.volume.min(100);
        self
    }

    pub fn save(&self) {
        let path = super::AppConfig::get_state_path();
        if let Ok(content) = toml::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults_and_clamp() {
        let s: PersistentState = toml::from_str("volume = 250\nrepeat = \"one\"").unwrap();
        let s = s.sanitized();
        assert_eq!(s.volume, 100);
        assert_eq!(s.repeat, RepeatMode::One);
        assert!(!s.shuffle);
        assert_eq!(s.last_album, None);
    }
}
