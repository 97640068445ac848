use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    // Global
    pub quit: String,
    pub toggle_keyhints: String,
    pub toggle_lyrics: String,

    // Transport
    pub play_pause: String,
    pub next_track: String,
    pub prev_track: String,
    pub seek_forward: String,
    pub seek_backward: String,
    pub volume_up: String,
    pub volume_down: String,
    pub shuffle: String,
    pub repeat: String,

    // Lyrics
    pub nav_up: String,
    pub nav_up_alt: String,
    pub nav_down: String,
    pub nav_down_alt: String,
    pub scroll_up: String,
    pub scroll_down: String,
    pub seek_to_line: String,
    pub clear_selection: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            toggle_keyhints: "?".to_string(),
            toggle_lyrics: "t".to_string(),

            play_pause: "Space".to_string(),
            next_track: "n".to_string(),
            prev_track: "p".to_string(),
            seek_forward: "l".to_string(),
            seek_backward: "h".to_string(),
            volume_up: "+".to_string(),
            volume_down: "-".to_string(),
            shuffle: "z".to_string(),
            repeat: "x".to_string(),

            nav_up: "k".to_string(),
            nav_up_alt: "Up".to_string(),
            nav_down: "j".to_string(),
            nav_down_alt: "Down".to_string(),
            scroll_up: "PageUp".to_string(),
            scroll_down: "PageDown".to_string(),
            seek_to_line: "Enter".to_string(),
            clear_selection: "Esc".to_string(),
        }
    }
}

/// Names accepted in `[keys]` besides single characters, with the label
/// the help popup shows for each.
const NAMED_KEYS: [(&str, KeyCode, &str); 8] = [
    ("Space", KeyCode::Char(' '), "Space"),
    ("Enter", KeyCode::Enter, "Enter"),
    ("Esc", KeyCode::Esc, "Esc"),
    ("Up", KeyCode::Up, "↑"),
    ("Down", KeyCode::Down, "↓"),
    ("PageUp", KeyCode::PageUp, "PgUp"),
    ("PageDown", KeyCode::PageDown, "PgDn"),
    ("Tab", KeyCode::Tab, "Tab"),
];

impl KeyConfig {
    pub fn matches(&self, event: KeyEvent, binding: &str) -> bool {
        if let Some((_, code, _)) = NAMED_KEYS.iter().find(|(name, _, _)| *name == binding) {
            return event.code == *code;
        }
        let mut chars = binding.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return false;
        };
        if !ch.is_uppercase() {
            return event.code == KeyCode::Char(ch);
        }
        // Terminals report Shift+letter either way
        event.code == KeyCode::Char(ch)
            || (event.code == KeyCode::Char(ch.to_ascii_lowercase())
                && event.modifiers.contains(KeyModifiers::SHIFT))
    }

    /// Label for the help popup.
    pub fn display(&self, binding: &str) -> String {
        NAMED_KEYS
            .iter()
            .find(|(name, _, _)| *name == binding)
            .map(|(_, _, label)| (*label).to_string())
            .unwrap_or_else(|| binding.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_matches_named_and_char_keys() {
        let k = KeyConfig::default();
        assert!(k.matches(key(KeyCode::Char(' ')), &k.play_pause));
        assert!(k.matches(key(KeyCode::PageDown), &k.scroll_down));
        assert!(k.matches(key(KeyCode::Char('+')), &k.volume_up));
        assert!(!k.matches(key(KeyCode::Char('m')), &k.next_track));
    }

    #[test]
    fn test_uppercase_accepts_shift() {
        let k = KeyConfig::default();
        let shifted = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::SHIFT);
        assert!(k.matches(shifted, "J"));
        assert!(!k.matches(key(KeyCode::Char('j')), "J"));
    }

    #[test]
    fn test_unknown_names_never_match() {
        let k = KeyConfig::default();
        assert!(!k.matches(key(KeyCode::F(1)), "F1"));
        assert!(!k.matches(key(KeyCode::Char('a')), "ab"));
        assert_eq!(k.display("PageDown"), "PgDn");
        assert_eq!(k.display("n"), "n");
    }
}
