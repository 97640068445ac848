use crate::app::config::AppConfig;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,
    pub text: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub magenta: Color,
    pub cyan: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),
            surface: Color::Rgb(49, 50, 68),
            overlay: Color::Rgb(108, 112, 134),
            text: Color::Rgb(205, 214, 244),
            red: Color::Rgb(243, 139, 168),
            green: Color::Rgb(166, 227, 161),
            yellow: Color::Rgb(249, 226, 175),
            blue: Color::Rgb(137, 180, 250),
            magenta: Color::Rgb(203, 166, 247),
            cyan: Color::Rgb(148, 226, 213),
        }
    }
}

// Helper for serialization/deserialization
#[derive(Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

impl Theme {
    /// Nested `[theme]` table first, then a flat file.
    pub fn parse(content: &str) -> Option<Self> {
        if let Ok(wrapper) = toml::from_str::<ThemeFile>(content) {
            return Some(wrapper.theme);
        }
        toml::from_str::<Theme>(content).ok()
    }
}

pub fn load_current_theme() -> Theme {
    let path = AppConfig::get_theme_path();

    if !path.exists() {
        // Auto-create default theme file if it doesn't exist
        let default_theme = Theme::default();
        let wrapper = ThemeFile {
            theme: default_theme.clone(),
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(toml_str) = toml::to_string_pretty(&wrapper) {
            let _ = fs::write(&path, toml_str);
        }
        return default_theme;
    }

    match fs::read_to_string(&path).ok().and_then(|c| Theme::parse(&c)) {
        Some(theme) => theme,
        None => {
            warn!(path = %path.display(), "unreadable theme.toml, using defaults");
            Theme::default()
        }
    }
}
