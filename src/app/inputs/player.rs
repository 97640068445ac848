use crate::app::App;
use crate::sync::SeekDirection;
use crossterm::event::KeyEvent;
use std::time::Instant;

const VOLUME_STEP: i16 = 5;

pub fn handle_player_events(key: KeyEvent, app: &mut App, now: Instant) -> bool {
    let keys = app.keys.clone();

    if keys.matches(key, &keys.play_pause) {
        app.session.toggle_play(now);
        return true;
    }

    // A key press is a click without a hold: it always skips
    if keys.matches(key, &keys.next_track) {
        app.session.rewind_click(now, SeekDirection::Forward);
        return true;
    }

    if keys.matches(key, &keys.prev_track) {
        app.session.rewind_click(now, SeekDirection::Backward);
        return true;
    }

    if keys.matches(key, &keys.seek_forward) || keys.matches(key, &keys.seek_backward) {
        let step = app.session.timings().rewind_step_secs;
        let delta = if keys.matches(key, &keys.seek_forward) { step } else { -step };
        app.session.seek_by(now, delta);
        return true;
    }

    if keys.matches(key, &keys.volume_up) {
        app.change_volume(VOLUME_STEP);
        return true;
    }

    if keys.matches(key, &keys.volume_down) {
        app.change_volume(-VOLUME_STEP);
        return true;
    }

    if keys.matches(key, &keys.shuffle) {
        app.toggle_shuffle();
        return true;
    }

    if keys.matches(key, &keys.repeat) {
        app.cycle_repeat();
        return true;
    }

    false
}
