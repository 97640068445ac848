use crate::app::App;
use crossterm::event::KeyEvent;
use std::time::Instant;

// Rows per PageUp/PageDown
const PAGE_ROWS: i32 = 8;

pub fn handle_lyrics_events(key: KeyEvent, app: &mut App, now: Instant) -> bool {
    let keys = app.keys.clone(); // Clone keys to avoid borrowing app

    if keys.matches(key, &keys.toggle_lyrics) {
        app.toggle_lyrics(now);
        return true;
    }

    if !app.session.lyrics_shown() {
        return false;
    }

    if keys.matches(key, &keys.nav_down) || keys.matches(key, &keys.nav_down_alt) {
        app.select_line(1);
        return true;
    }

    if keys.matches(key, &keys.nav_up) || keys.matches(key, &keys.nav_up_alt) {
        app.select_line(-1);
        return true;
    }

    if keys.matches(key, &keys.scroll_down) {
        app.scroll_lyrics(now, PAGE_ROWS);
        return true;
    }

    if keys.matches(key, &keys.scroll_up) {
        app.scroll_lyrics(now, -PAGE_ROWS);
        return true;
    }

    // Enter only belongs to lyrics while a line is selected
    if keys.matches(key, &keys.seek_to_line) {
        return app.seek_to_selected(now);
    }

    if keys.matches(key, &keys.clear_selection) && app.lyrics_selected.is_some() {
        app.lyrics_selected = None;
        return true;
    }

    false
}
