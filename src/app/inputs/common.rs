use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_common_events(key: KeyEvent, app: &mut App) -> bool {
    let keys = &app.keys;

    // Quit ('q')
    if keys.matches(key, &keys.quit) {
        // Close popups first, then quit (Neovim-style)
        if app.show_keyhints {
            app.show_keyhints = false;
        } else {
            app.is_running = false;
        }
        return true;
    }

    if keys.matches(key, &keys.toggle_keyhints) {
        app.show_keyhints = !app.show_keyhints;
        return true;
    }

    // Global Popup Close (Esc)
    if key.code == KeyCode::Esc && app.show_keyhints {
        app.show_keyhints = false;
        return true;
    }

    false
}
