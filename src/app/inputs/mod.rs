use crate::app::App;
use crate::sync::Activity;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use std::time::Instant;

pub mod common;
pub mod lyrics;
pub mod mouse;
pub mod player;

pub fn handle_event(event: Event, app: &mut App, now: Instant) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, app, now),
        Event::Mouse(mouse) => mouse::handle_mouse_event(mouse, app, now),
        // Resize is picked up by the next draw
        _ => {}
    }
}

fn handle_key(key: KeyEvent, app: &mut App, now: Instant) {
    app.session.on_activity(now, Activity::Key);

    // 1. Common/Global Keys (Quit, Help)
    if common::handle_common_events(key, app) {
        return;
    }

    // 2. Lyrics navigation. If consumed, we stop.
    if lyrics::handle_lyrics_events(key, app, now) {
        return;
    }

    // 3. Transport
    player::handle_player_events(key, app, now);
}
