use super::album::Album;
use super::config::{PersistentState, UserConfig};
use super::keys::KeyConfig;
use crate::lyrics::{LyricsSlot, ResolveRequest, ResolvedLyrics, TrackKey};
use crate::player::{ClockMedia, RepeatMode};
use crate::sync::{Activity, PlayerSession, SessionConfig};
use crate::ui::theme::Theme;
use crate::ui::viewport::TerminalViewport;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

pub type Session = PlayerSession<ClockMedia, TerminalViewport>;

const TOAST_DURATION: Duration = Duration::from_millis(2000); // 2s display time

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub start_time: Instant,
    pub deadline: Instant,
}

/// Where things were drawn last frame, for mouse hit-testing 🎯
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub lyrics: Option<Rect>,
    pub progress: Option<Rect>,
    pub prev: Option<Rect>,
    pub play: Option<Rect>,
    pub next: Option<Rect>,
    pub shuffle: Option<Rect>,
    pub repeat: Option<Rect>,
}

pub struct App {
    pub theme: Theme,
    pub keys: KeyConfig,
    pub config: UserConfig,

    pub is_running: bool,
    pub album: Album,
    pub album_path: Option<PathBuf>,
    pub current_track: Option<usize>,

    /// Player core: media, lyrics viewport and every sync timer.
    pub session: Session,
    /// Lyrics of `current_track`, tagged with the track key.
    pub slot: LyricsSlot,

    // Manual selection for j/k navigation
    pub lyrics_selected: Option<usize>,

    /// Pointer state across press/drag/release
    pub dragging_progress: bool,
    pub held_rewind: Option<crate::sync::SeekDirection>,
    pub hit: HitAreas,

    /// UI State
    pub show_keyhints: bool,
    pub toast: Option<Toast>,
}

impl App {
    pub fn new(
        config: UserConfig,
        state: PersistentState,
        album: Album,
        album_path: Option<PathBuf>,
        start_track: Option<usize>,
        now: Instant,
    ) -> Self {
        let session_config = SessionConfig {
            timings: config.timings.clone(),
            pointer: config.pointer,
            strategy: config.scroll_strategy,
        };
        let mut session = PlayerSession::new(
            ClockMedia::new(now),
            TerminalViewport::default(),
            album.tracks.len(),
            session_config,
        );
        session.set_volume(state.volume);
        session.set_repeat(state.repeat);
        session.set_shuffle(state.shuffle);

        let first = start_track
            .filter(|i| *i < album.tracks.len())
            .or_else(|| session.playlist().current())
            .unwrap_or(0);
        session.select_track(first);
        session.set_playing(now, true);
        session.show_lyrics(now);

        Self {
            theme: Theme::default(),
            keys: config.keys.clone(),
            config,
            is_running: true,
            album,
            album_path,
            current_track: None,
            session,
            slot: LyricsSlot::default(),
            lyrics_selected: None,
            dragging_progress: false,
            held_rewind: None,
            hit: HitAreas::default(),
            show_keyhints: false,
            toast: None,
        }
    }

    pub fn show_toast(&mut self, message: &str) {
        let now = Instant::now();
        let deadline = now + TOAST_DURATION;

        if let Some(ref mut current) = self.toast {
            // Rapid updates keep the entrance time so the toast does not
            // slide in again
            current.message = message.to_string();
            current.deadline = deadline;
        } else {
            self.toast = Some(Toast {
                message: message.to_string(),
                start_time: now,
                deadline,
            });
        }
    }

    /// Frame tick: move the clock, feed its events, run the timers.
    pub fn on_tick(&mut self, now: Instant) {
        // Handle Toast Expiry
        if self.toast.as_ref().is_some_and(|t| now > t.deadline) {
            self.toast = None;
        }

        self.session.media_mut().advance(now);
        for event in self.session.media_mut().drain_events() {
            self.session.handle_media_event(now, event);
        }
        self.session.on_frame(now);
    }

    /// Loads whatever track navigation asked for. The returned request is
    /// resolved off-thread and comes back through `on_lyrics_resolved`.
    pub fn poll_track_change(&mut self, now: Instant) -> Option<ResolveRequest> {
        let index = self.session.take_track_change()?;
        let track = self.album.tracks.get(index)?;
        info!(track = %track.id, title = %track.title, "loading track");

        let duration = track.duration_hint();
        self.current_track = Some(index);
        self.lyrics_selected = None;
        self.session.container_mut().clear();
        self.session.on_track_change(now, Some(duration));

        let request = self.album.resolve_request(index, &self.config.lang)?;
        self.slot.begin(request.key.clone(), request.has_synced_hint());
        Some(request)
    }

    /// Returns `false` for a result that belongs to a track no longer current.
    pub fn on_lyrics_resolved(&mut self, now: Instant, key: TrackKey, resolved: ResolvedLyrics) -> bool {
        if !self.slot.complete(&key, resolved) {
            return false;
        }
        let lines = self.slot.synced_lines().map(<[_]>::to_vec);
        let viewport = self.session.container_mut();
        match (&lines, self.slot.plain_text()) {
            (Some(lines), _) => viewport.set_lines(lines),
            (None, Some(text)) => viewport.set_plain(text),
            (None, None) => viewport.clear(),
        }
        self.session.set_lyrics(now, lines.unwrap_or_default());
        true
    }

    pub fn current_title(&self) -> &str {
        self.current_track
            .and_then(|i| self.album.tracks.get(i))
            .map(|t| t.title.as_str())
            .unwrap_or("")
    }

    /// Karaoke lines are on screen (as opposed to plain text or nothing).
    pub fn has_synced_lyrics(&self) -> bool {
        !self.session.lines().is_empty()
    }

    // --- Actions shared by keyboard and mouse ---

    pub fn toggle_lyrics(&mut self, now: Instant) {
        if !self.session.lyrics_shown() && !self.slot.has_content() && !self.slot.is_loading() {
            self.show_toast("No lyrics for this track");
            return;
        }
        self.session.toggle_lyrics(now);
    }

    /// Wheel or page scroll over the transcript; counts as the user's.
    pub fn scroll_lyrics(&mut self, now: Instant, rows: i32) {
        if !self.session.lyrics_shown() {
            return;
        }
        if self.session.container_mut().scroll_rows(rows) {
            self.session.on_scroll_event();
        }
        self.session.on_activity(now, Activity::PointerMove);
    }

    pub fn select_line(&mut self, delta: isize) {
        let count = self.session.lines().len();
        if count == 0 || !self.session.lyrics_shown() {
            return;
        }
        let base = self
            .lyrics_selected
            .or(self.session.active_line())
            .unwrap_or(0);
        let next = base.saturating_add_signed(delta).min(count - 1);
        self.lyrics_selected = Some(next);
        if self.session.container_mut().reveal(next) {
            self.session.on_scroll_event();
        }
    }

    pub fn seek_to_selected(&mut self, now: Instant) -> bool {
        match self.lyrics_selected.take() {
            Some(index) => {
                self.session.seek_to_line(now, index);
                true
            }
            None => false,
        }
    }

    pub fn change_volume(&mut self, delta: i16) {
        self.session.change_volume(delta);
        self.show_toast(&format!("🔊 Volume: {}%", self.session.volume()));
        self.save_state();
    }

    pub fn toggle_shuffle(&mut self) {
        let on = self.session.toggle_shuffle();
        self.show_toast(if on { "🔀 Shuffle: On" } else { "🔀 Shuffle: Off" });
        self.save_state();
    }

    pub fn cycle_repeat(&mut self) {
        let mode = self.session.cycle_repeat();
        let icon = if mode == RepeatMode::One { "🔂" } else { "🔁" };
        self.show_toast(&format!("{icon} Repeat: {}", mode.label()));
        self.save_state();
    }

    pub fn persistent_state(&self) -> PersistentState {
        PersistentState {
            volume: self.session.volume(),
            repeat: self.session.playlist().repeat(),
            shuffle: self.session.playlist().is_shuffled(),
            last_album: self
                .album_path
                .as_ref()
                .map(|p| p.display().to_string()),
            last_track: self
                .current_track
                .and_then(|i| self.album.tracks.get(i))
                .map(|t| t.id.clone()),
        }
    }

    pub fn save_state(&self) {
        self.persistent_state().save();
    }
}
