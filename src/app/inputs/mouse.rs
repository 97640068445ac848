use crate::app::App;
use crate::sync::{Activity, SeekDirection};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::time::Instant;

// Rows per wheel notch
const WHEEL_ROWS: i32 = 1;

fn hits(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|r| r.contains(Position::new(column, row)))
}

/// Playhead seconds for a column of the progress bar.
fn seconds_at(area: Rect, column: u16, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 {
        return None;
    }
    let span = f64::from(area.width.saturating_sub(1).max(1));
    let ratio = (f64::from(column.saturating_sub(area.x)) / span).clamp(0.0, 1.0);
    Some(ratio * duration)
}

pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App, now: Instant) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved => app.session.on_activity(now, Activity::PointerMove),
        MouseEventKind::ScrollDown if hits(app.hit.lyrics, column, row) => {
            app.scroll_lyrics(now, WHEEL_ROWS)
        }
        MouseEventKind::ScrollUp if hits(app.hit.lyrics, column, row) => {
            app.scroll_lyrics(now, -WHEEL_ROWS)
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.session.on_activity(now, Activity::Press);
            on_press(app, now, column, row);
        }
        MouseEventKind::Drag(MouseButton::Left) => on_drag(app, now, column, row),
        MouseEventKind::Up(MouseButton::Left) => on_release(app, now, column, row),
        _ => {}
    }
}

fn rewind_area(app: &App, direction: SeekDirection) -> Option<Rect> {
    match direction {
        SeekDirection::Backward => app.hit.prev,
        SeekDirection::Forward => app.hit.next,
    }
}

fn on_press(app: &mut App, now: Instant, column: u16, row: u16) {
    let hit = app.hit;

    if let Some(area) = hit.progress.filter(|_| hits(hit.progress, column, row)) {
        if let Some(seconds) = seconds_at(area, column, app.session.duration()) {
            app.dragging_progress = true;
            app.session.progress_change(now, seconds);
        }
        return;
    }

    for direction in [SeekDirection::Backward, SeekDirection::Forward] {
        if hits(rewind_area(app, direction), column, row) {
            app.held_rewind = Some(direction);
            app.session.rewind_press(now, direction);
            return;
        }
    }

    if hits(hit.play, column, row) {
        app.session.toggle_play(now);
    } else if hits(hit.shuffle, column, row) {
        app.toggle_shuffle();
    } else if hits(hit.repeat, column, row) {
        app.cycle_repeat();
    } else if let Some(area) = hit.lyrics.filter(|_| hits(hit.lyrics, column, row)) {
        // Click on a karaoke line jumps there
        if app.has_synced_lyrics() {
            if let Some(index) = app.session.container().line_at(row - area.y) {
                app.lyrics_selected = None;
                app.session.seek_to_line(now, index);
            }
        }
    }
}

fn on_drag(app: &mut App, now: Instant, column: u16, row: u16) {
    if app.dragging_progress {
        if let Some(area) = app.hit.progress {
            if let Some(seconds) = seconds_at(area, column, app.session.duration()) {
                app.session.progress_change(now, seconds);
            }
        }
        return;
    }

    // Sliding off a held button abandons the hold
    if let Some(direction) = app.held_rewind {
        if !hits(rewind_area(app, direction), column, row) {
            app.held_rewind = None;
            app.session.rewind_cancel(direction);
        }
    }
}

fn on_release(app: &mut App, now: Instant, column: u16, row: u16) {
    if std::mem::take(&mut app.dragging_progress) {
        app.session.progress_end(now);
        return;
    }

    if let Some(direction) = app.held_rewind.take() {
        if hits(rewind_area(app, direction), column, row) {
            app.session.rewind_release(now, direction);
        } else {
            app.session.rewind_cancel(direction);
        }
    }
}
