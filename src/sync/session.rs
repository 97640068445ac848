use super::autoscroll::AutoscrollController;
use super::controls::{Activity, ControlsEnv, ControlsVisibility};
use super::manual::{ManualScrollInterpreter, ScrollContext, ScrollOutcome};
use super::rewind::{RewindAction, RewindButton, SeekDirection};
use super::scroll_state::{OpacityMode, ScrollState, SuppressionWindows};
use super::timings::SyncTimings;
use super::viewport::{ScrollBehavior, ScrollContainer, TaggedContainer};
use super::{ms, PointerKind, ScrollStrategy};
use crate::lyrics::{active_line_index, LyricsLine};
use crate::player::{MediaElement, MediaEvent, Playlist, RepeatMode, TimeDisplay};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub timings: SyncTimings,
    pub pointer: PointerKind,
    /// `None` picks the strategy that suits the pointer.
    pub strategy: Option<ScrollStrategy>,
}

/// Everything one mounted player owns: the media element, the lyrics
/// viewport and the timers that keep them from stepping on each other.
///
/// Every method takes the current instant; nothing in here reads the clock.
pub struct PlayerSession<M, C> {
    media: M,
    container: TaggedContainer<C>,
    timings: SyncTimings,
    pointer: PointerKind,

    lines: Vec<LyricsLine>,
    playlist: Playlist,
    pending_track: Option<usize>,

    is_playing: bool,
    current_time: f64,
    duration: f64,
    last_time_update: Option<Instant>,
    seeking: bool,
    seek_settle_at: Option<Instant>,
    suppress_active_line: bool,
    active_line: Option<usize>,
    volume: u8,
    time_display: TimeDisplay,

    lyrics_shown: bool,
    pending_scroll_event: bool,
    state: ScrollState,
    windows: SuppressionWindows,
    controls: ControlsVisibility,
    manual: ManualScrollInterpreter,
    autoscroll: AutoscrollController,
    rewind_prev: RewindButton,
    rewind_next: RewindButton,
}

impl<M: MediaElement, C: ScrollContainer> PlayerSession<M, C> {
    pub fn new(media: M, container: C, track_count: usize, config: SessionConfig) -> Self {
        let timings = config.timings.validated();
        let strategy = config
            .strategy
            .unwrap_or_else(|| ScrollStrategy::for_pointer(config.pointer));
        let container = TaggedContainer::new(
            container,
            ms(timings.programmatic_window_ms),
            ms(timings.listener_grace_ms),
        );
        Self {
            media,
            container,
            pointer: config.pointer,
            lines: Vec::new(),
            playlist: Playlist::new(track_count),
            pending_track: None,
            is_playing: false,
            current_time: 0.0,
            duration: f64::NAN,
            last_time_update: None,
            seeking: false,
            seek_settle_at: None,
            suppress_active_line: false,
            active_line: None,
            volume: 50,
            time_display: TimeDisplay::default(),
            lyrics_shown: false,
            pending_scroll_event: false,
            state: ScrollState::default(),
            windows: SuppressionWindows::default(),
            controls: ControlsVisibility::default(),
            manual: ManualScrollInterpreter::default(),
            autoscroll: AutoscrollController::new(strategy),
            rewind_prev: RewindButton::new(SeekDirection::Backward),
            rewind_next: RewindButton::new(SeekDirection::Forward),
            timings,
        }
    }

    // --- Accessors ---

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn container(&self) -> &C {
        self.container.get()
    }

    /// Host-side access to the viewport (layout, user scrolling). Scrolls
    /// made through here count as the user's.
    pub fn container_mut(&mut self) -> &mut C {
        self.container.get_mut()
    }

    pub fn timings(&self) -> &SyncTimings {
        &self.timings
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn lines(&self) -> &[LyricsLine] {
        &self.lines
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn active_line(&self) -> Option<usize> {
        self.active_line
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn time_display(&self) -> &TimeDisplay {
        &self.time_display
    }

    pub fn lyrics_shown(&self) -> bool {
        self.lyrics_shown
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.state
    }

    pub fn opacity(&self) -> OpacityMode {
        self.state.opacity
    }

    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    pub fn is_rewinding(&self) -> bool {
        self.rewind_prev.is_rewinding() || self.rewind_next.is_rewinding()
    }

    pub fn autoscroll_strategy(&self) -> ScrollStrategy {
        self.autoscroll.strategy()
    }

    fn env(&self) -> ControlsEnv {
        ControlsEnv {
            pointer: self.pointer,
            lyrics_shown: self.lyrics_shown,
            playing: self.is_playing,
        }
    }

    fn duration_known(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    fn clamp_time(&self, seconds: f64) -> f64 {
        if self.duration_known() {
            seconds.clamp(0.0, self.duration)
        } else {
            seconds.max(0.0)
        }
    }

    /// Track the owner must load next, if navigation happened.
    pub fn take_track_change(&mut self) -> Option<usize> {
        self.pending_track.take()
    }

    // --- Media events ---

    pub fn handle_media_event(&mut self, now: Instant, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata => self.on_loaded_metadata(now),
            MediaEvent::DurationChange => self.on_duration_change(),
            MediaEvent::TimeUpdate => self.on_time_update(now),
            MediaEvent::Ended => self.on_ended(now),
        }
    }

    pub fn on_loaded_metadata(&mut self, now: Instant) {
        self.current_time = self.media.current_time();
        self.duration = self.media.duration();
        if self.is_playing {
            self.media.play();
        }
        self.time_display
            .force(now, self.current_time, self.duration);
    }

    pub fn on_duration_change(&mut self) {
        self.duration = self.media.duration();
    }

    pub fn on_time_update(&mut self, now: Instant) {
        if self.seeking {
            return;
        }
        if self.last_time_update.is_some_and(|at| {
            now.saturating_duration_since(at) < ms(self.timings.time_update_throttle_ms)
        }) {
            return;
        }
        self.last_time_update = Some(now);
        let time = self.media.current_time();
        if self.suppress_active_line && time > self.current_time {
            self.suppress_active_line = false;
        }
        self.current_time = time;
        self.duration = self.media.duration();
        self.time_display.refresh(
            now,
            self.current_time,
            self.duration,
            ms(self.timings.time_update_throttle_ms),
        );
        self.sync_to_time(now);
    }

    pub fn on_ended(&mut self, now: Instant) {
        let position = self.media.current_time();
        if !self.duration_known() || position < self.duration - self.timings.ended_tolerance_secs {
            return;
        }
        match self.playlist.repeat() {
            RepeatMode::One => {
                debug!("repeat one, restarting track");
                self.restart(now);
                self.media.play();
            }
            RepeatMode::All => self.advance(now),
            RepeatMode::None if !self.playlist.is_last() => self.advance(now),
            RepeatMode::None => {
                info!("end of playlist");
                self.is_playing = false;
                self.media.pause();
                self.restart(now);
                self.container.scroll_to(now, 0.0, ScrollBehavior::Instant);
                self.manual.ignore(0.0);
                self.state.saved_scroll_top = 0.0;
                self.controls
                    .on_env_change(now, self.env(), &mut self.windows, &self.timings);
            }
        }
    }

    fn advance(&mut self, now: Instant) {
        if let Some(track) = self.playlist.next(now, ms(self.timings.next_guard_ms)) {
            self.pending_track = Some(track);
        }
    }

    fn restart(&mut self, now: Instant) {
        self.media.set_current_time(0.0);
        self.current_time = 0.0;
        self.time_display.force(now, 0.0, self.duration);
        self.sync_to_time(now);
    }

    // --- Lyrics and tracks ---

    /// New track: drop everything that belonged to the old one.
    pub fn on_track_change(&mut self, now: Instant, duration_hint: Option<f64>) {
        debug!(track = ?self.playlist.current(), "track change");
        self.lines.clear();
        self.active_line = None;
        self.suppress_active_line = true;
        self.current_time = 0.0;
        self.duration = f64::NAN;
        self.seeking = false;
        self.seek_settle_at = None;
        self.last_time_update = None;
        self.rewind_prev.cancel();
        self.rewind_next.cancel();
        self.autoscroll.reset();
        self.state.reset();
        self.manual.reset(0.0);
        self.container.scroll_to(now, 0.0, ScrollBehavior::Instant);
        self.media.load(duration_hint);
        self.time_display.force(now, 0.0, f64::NAN);
    }

    pub fn set_lyrics(&mut self, now: Instant, lines: Vec<LyricsLine>) {
        self.lines = lines;
        self.autoscroll.cancel();
        self.manual.ignore(self.container.get().scroll_top());
        self.sync_to_time(now);
    }

    pub fn select_track(&mut self, track: usize) {
        if let Some(t) = self.playlist.select(track) {
            self.pending_track = Some(t);
        }
    }

    fn recompute_active_line(&mut self) {
        self.active_line = active_line_index(
            &self.lines,
            self.current_time,
            self.is_playing,
            self.suppress_active_line,
        );
    }

    fn sync_to_time(&mut self, now: Instant) {
        self.recompute_active_line();
        let _ = self.autoscroll.tick(
            now,
            &mut self.container,
            &self.lines,
            self.active_line,
            self.current_time,
            self.lyrics_shown,
            &mut self.state,
            &self.timings,
        );
    }

    // --- Scroll events and frames ---

    /// The viewport moved. Handled on the next frame so bursts coalesce.
    pub fn on_scroll_event(&mut self) {
        self.pending_scroll_event = true;
    }

    /// Per-frame housekeeping: scroll interpretation, timers, animation.
    pub fn on_frame(&mut self, now: Instant) {
        let env = self.env();

        if std::mem::take(&mut self.pending_scroll_event) {
            if self.container.accepts_events(now) {
                let mut ctx = ScrollContext {
                    state: &mut self.state,
                    windows: &mut self.windows,
                    controls: &mut self.controls,
                    env,
                    seeking: self.seeking,
                    timings: &self.timings,
                };
                if self.manual.process(now, self.container.get(), &mut ctx) == ScrollOutcome::User {
                    self.autoscroll.cancel();
                }
            } else {
                self.manual.ignore(self.container.get().scroll_top());
            }
        }

        let mut ctx = ScrollContext {
            state: &mut self.state,
            windows: &mut self.windows,
            controls: &mut self.controls,
            env,
            seeking: self.seeking,
            timings: &self.timings,
        };
        self.manual.poll(now, self.container.get(), &mut ctx);
        self.controls
            .poll(now, env, &mut self.windows, &self.timings);

        if self.seek_settle_at.is_some_and(|at| now >= at) {
            self.seek_settle_at = None;
            self.seeking = false;
            self.windows
                .protect_seek(now, ms(self.timings.seek_protection_after_ms));
            self.is_playing = true;
            self.media.play();
        }

        let mut actions = self.rewind_prev.poll(now, &self.timings);
        actions.extend(self.rewind_next.poll(now, &self.timings));
        for action in actions {
            self.apply_rewind(now, action);
        }

        self.autoscroll.step(now, &mut self.container);
    }

    // --- Seeking ---

    /// Clicking a lyric line jumps playback to it.
    pub fn seek_to_line(&mut self, now: Instant, index: usize) {
        if !self.duration_known() {
            return;
        }
        let Some(line) = self.lines.get(index) else {
            return;
        };
        let target = self.clamp_time(line.start_time);
        debug!(index, target, "seek to line");
        self.suppress_active_line = false;
        self.media.set_current_time(target);
        self.current_time = target;
        self.seeking = true;
        self.windows
            .protect_seek(now, ms(self.timings.seek_protection_ms));
        self.seek_settle_at = Some(now + ms(self.timings.line_seek_settle_ms));
        self.time_display.force(now, target, self.duration);
        self.sync_to_time(now);
    }

    /// Progress slider moved.
    pub fn progress_change(&mut self, now: Instant, seconds: f64) {
        let target = self.clamp_time(seconds);
        self.suppress_active_line = false;
        self.media.set_current_time(target);
        self.current_time = target;
        self.seeking = true;
        self.state.user_scroll_at = None;
        self.state.is_user_scrolling = false;
        self.state.opacity = OpacityMode::Seeking;
        self.controls.on_activity(
            now,
            Activity::Press,
            self.env(),
            &mut self.windows,
            &self.timings,
        );
        self.windows
            .protect_seek(now, ms(self.timings.seek_protection_ms));
        self.time_display.force(now, target, self.duration);
        self.sync_to_time(now);
    }

    /// Progress slider released.
    pub fn progress_end(&mut self, now: Instant) {
        self.seeking = false;
        if self.is_playing {
            self.media.play();
        }
        self.windows
            .protect_seek(now, ms(self.timings.seek_protection_after_ms));
        if self.state.since_user_scroll(now) >= ms(self.timings.manual_deference_ms)
            && self.state.opacity != OpacityMode::UserScrolling
        {
            self.state.opacity = OpacityMode::Normal;
        }
    }

    /// Relative seek (keyboard or rewind-hold).
    pub fn seek_by(&mut self, now: Instant, delta: f64) {
        let target = self.clamp_time(self.media.current_time() + delta);
        self.suppress_active_line = false;
        self.media.set_current_time(target);
        self.current_time = target;
        self.state.user_scroll_at = None;
        self.windows
            .protect_seek(now, ms(self.timings.seek_protection_ms));
        self.time_display.force(now, target, self.duration);
        self.sync_to_time(now);
    }

    // --- Transport ---

    pub fn toggle_play(&mut self, now: Instant) {
        self.set_playing(now, !self.is_playing);
    }

    pub fn set_playing(&mut self, now: Instant, playing: bool) {
        self.is_playing = playing;
        if playing {
            self.media.play();
        } else {
            self.media.pause();
        }
        self.controls
            .on_env_change(now, self.env(), &mut self.windows, &self.timings);
        self.recompute_active_line();
    }

    pub fn next(&mut self, now: Instant) {
        self.advance(now);
    }

    /// Early in a track goes to the previous one, otherwise restarts.
    pub fn prev(&mut self, now: Instant) {
        if self.media.current_time() < self.timings.restart_threshold_secs {
            if let Some(track) = self.playlist.prev() {
                self.pending_track = Some(track);
            }
        } else {
            self.suppress_active_line = false;
            self.restart(now);
        }
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.media.set_volume(f64::from(self.volume) / 100.0);
    }

    pub fn change_volume(&mut self, delta: i16) {
        let v = (i16::from(self.volume) + delta).clamp(0, 100);
        self.set_volume(v as u8);
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.playlist.toggle_shuffle()
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.playlist.is_shuffled() != enabled {
            self.playlist.toggle_shuffle();
        }
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.playlist.cycle_repeat()
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.playlist.set_repeat(mode);
    }

    fn rewind_button(&mut self, direction: SeekDirection) -> &mut RewindButton {
        match direction {
            SeekDirection::Backward => &mut self.rewind_prev,
            SeekDirection::Forward => &mut self.rewind_next,
        }
    }

    pub fn rewind_press(&mut self, now: Instant, direction: SeekDirection) {
        self.rewind_button(direction).press(now);
    }

    pub fn rewind_release(&mut self, now: Instant, direction: SeekDirection) {
        let timings = self.timings.clone();
        for action in self.rewind_button(direction).release(now, &timings) {
            self.apply_rewind(now, action);
        }
    }

    pub fn rewind_click(&mut self, now: Instant, direction: SeekDirection) {
        if let Some(action) = self.rewind_button(direction).click(now) {
            self.apply_rewind(now, action);
        }
    }

    /// Pointer left the button mid-hold.
    pub fn rewind_cancel(&mut self, direction: SeekDirection) {
        self.rewind_button(direction).cancel();
    }

    fn apply_rewind(&mut self, now: Instant, action: RewindAction) {
        match action {
            RewindAction::Seek(delta) => self.seek_by(now, delta),
            RewindAction::Skip(SeekDirection::Forward) => self.next(now),
            RewindAction::Skip(SeekDirection::Backward) => self.prev(now),
        }
    }

    // --- Visibility ---

    pub fn on_activity(&mut self, now: Instant, activity: Activity) {
        self.controls
            .on_activity(now, activity, self.env(), &mut self.windows, &self.timings);
    }

    pub fn toggle_lyrics(&mut self, now: Instant) {
        self.windows
            .suppress_scroll_handling(now, ms(self.timings.toggle_scroll_suppress_ms));
        self.controls
            .ignore_activity_for(now, self.timings.toggle_ignore_activity_ms);
        if self.lyrics_shown {
            self.hide_lyrics(now);
        } else {
            self.show_lyrics(now);
        }
    }

    pub fn show_lyrics(&mut self, now: Instant) {
        if self.lyrics_shown {
            return;
        }
        self.lyrics_shown = true;
        self.container.listen(now);
        self.restore_scroll(now);
        self.controls
            .on_env_change(now, self.env(), &mut self.windows, &self.timings);
    }

    pub fn hide_lyrics(&mut self, now: Instant) {
        if !self.lyrics_shown {
            return;
        }
        self.state.saved_scroll_top = self.container.get().scroll_top();
        self.state.is_user_scrolling = false;
        self.state.user_scrolled_to_end = false;
        self.state.opacity = OpacityMode::Normal;
        self.state.restoring_until = None;
        self.state.just_restored_until = None;
        self.autoscroll.cancel();
        self.container.stop_listening();
        self.lyrics_shown = false;
        self.controls
            .on_env_change(now, self.env(), &mut self.windows, &self.timings);
    }

    /// Puts the saved scroll position back and holds autoscroll off while
    /// the layout settles.
    pub fn restore_scroll(&mut self, now: Instant) {
        let saved = self.state.saved_scroll_top;
        let settle = now + ms(self.timings.restore_settle_ms);
        self.state.restoring_until = Some(settle);
        self.state.just_restored_until = Some(settle + ms(self.timings.restore_grace_ms));
        self.state.user_scroll_at = Some(now);
        self.autoscroll.cancel();
        self.container.scroll_to(now, saved, ScrollBehavior::Instant);
        self.manual.ignore(self.container.get().scroll_top());
    }
}
