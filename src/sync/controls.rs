use super::scroll_state::{ScrollDirection, SuppressionWindows};
use super::timings::SyncTimings;
use super::{ms, PointerKind};
use std::time::Instant;
use tracing::debug;

/// What the transport controls look like right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsPhase {
    Visible,
    Hidden,
    /// Just toggled; direction reactions are ignored until the cooldown ends.
    Cooldown { visible: bool },
}

/// Inputs the visibility rules depend on.
#[derive(Debug, Clone, Copy)]
pub struct ControlsEnv {
    pub pointer: PointerKind,
    pub lyrics_shown: bool,
    pub playing: bool,
}

/// Kind of interaction that counts as "the user is here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    PointerMove,
    Press,
    Key,
}

/// Transport-controls visibility with an inactivity timer.
#[derive(Debug, Clone)]
pub struct ControlsVisibility {
    visible: bool,
    hide_at: Option<Instant>,
    last_reset_at: Option<Instant>,
    ignore_activity_until: Option<Instant>,
}

impl Default for ControlsVisibility {
    fn default() -> Self {
        Self {
            visible: true,
            hide_at: None,
            last_reset_at: None,
            ignore_activity_until: None,
        }
    }
}

impl ControlsVisibility {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide_at
    }

    pub fn phase(&self, now: Instant, windows: &SuppressionWindows) -> ControlsPhase {
        if windows.controls_cooling_down(now) {
            ControlsPhase::Cooldown {
                visible: self.visible,
            }
        } else if self.visible {
            ControlsPhase::Visible
        } else {
            ControlsPhase::Hidden
        }
    }

    /// (Re)arms the inactivity timer. Touch-first devices never auto-hide.
    pub fn schedule_hide(&mut self, now: Instant, env: ControlsEnv, t: &SyncTimings) {
        if env.pointer == PointerKind::Coarse {
            self.visible = true;
            self.hide_at = None;
            return;
        }
        self.hide_at = (env.lyrics_shown && env.playing).then(|| now + ms(t.inactivity_hide_ms));
    }

    pub fn show(
        &mut self,
        now: Instant,
        env: ControlsEnv,
        windows: &mut SuppressionWindows,
        t: &SyncTimings,
    ) {
        self.hide_at = None;
        windows.suppress_scroll_handling(now, ms(t.show_suppress_ms));
        self.visible = true;
        let cooldown = match env.pointer {
            PointerKind::Coarse => t.show_cooldown_coarse_ms,
            PointerKind::Fine => t.show_cooldown_ms,
        };
        windows.cool_down_controls(now, ms(cooldown));
        self.schedule_hide(now, env, t);
    }

    /// Any qualifying interaction shows the controls again. Resets are
    /// throttled so a moving pointer does not thrash the timer. Never opens
    /// the scroll-suppression window, since wheel scrolls count as activity.
    pub fn on_activity(
        &mut self,
        now: Instant,
        activity: Activity,
        env: ControlsEnv,
        windows: &mut SuppressionWindows,
        t: &SyncTimings,
    ) {
        if self.ignore_activity_until.is_some_and(|until| now < until) {
            return;
        }
        if activity == Activity::PointerMove
            && self
                .last_reset_at
                .is_some_and(|at| now.saturating_duration_since(at) < ms(t.activity_throttle_ms))
        {
            return;
        }
        self.last_reset_at = Some(now);
        if !self.visible {
            self.visible = true;
            let cooldown = match env.pointer {
                PointerKind::Coarse => t.show_cooldown_coarse_ms,
                PointerKind::Fine => t.show_cooldown_ms,
            };
            windows.cool_down_controls(now, ms(cooldown));
        }
        self.schedule_hide(now, env, t);
    }

    /// Activity right after a view toggle is the toggle itself.
    pub fn ignore_activity_for(&mut self, now: Instant, window_ms: u64) {
        self.ignore_activity_until = Some(now + ms(window_ms));
    }

    /// Playback or lyrics visibility changed.
    pub fn on_env_change(
        &mut self,
        now: Instant,
        env: ControlsEnv,
        windows: &mut SuppressionWindows,
        t: &SyncTimings,
    ) {
        if env.lyrics_shown && env.playing {
            self.last_reset_at = Some(now);
            self.show(now, env, windows, t);
        } else {
            self.hide_at = None;
        }
    }

    /// Fires the inactivity timer. Returns `true` when the controls hid.
    pub fn poll(
        &mut self,
        now: Instant,
        env: ControlsEnv,
        windows: &mut SuppressionWindows,
        t: &SyncTimings,
    ) -> bool {
        match self.hide_at {
            Some(at) if now >= at => {
                self.hide_at = None;
                if env.lyrics_shown && env.playing && self.visible {
                    windows.suppress_scroll_handling(now, ms(t.show_suppress_ms));
                    self.visible = false;
                    debug!("controls hidden after inactivity");
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Reaction to a classified scroll direction: down hides, up shows.
    pub fn apply_direction(
        &mut self,
        now: Instant,
        direction: ScrollDirection,
        env: ControlsEnv,
        seek_blocked: bool,
        windows: &mut SuppressionWindows,
        t: &SyncTimings,
    ) {
        let phase = self.phase(now, windows);
        if let ControlsPhase::Cooldown { .. } = phase {
            return;
        }
        match direction {
            ScrollDirection::Down => {
                if seek_blocked || env.pointer == PointerKind::Coarse {
                    return;
                }
                let window = ms(t.hide_suppress_ms);
                windows.suppress_scroll_handling(now, window);
                if phase == ControlsPhase::Visible {
                    self.visible = false;
                    self.hide_at = None;
                }
                windows.cool_down_controls(now, window);
                debug!("controls hidden by downward scroll");
            }
            ScrollDirection::Up => {
                windows.suppress_scroll_handling(now, ms(t.show_suppress_ms));
                self.show(now, env, windows, t);
                windows.cool_down_controls(now, ms(t.show_cooldown_ms));
                debug!("controls shown by upward scroll");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn env() -> ControlsEnv {
        ControlsEnv {
            pointer: PointerKind::Fine,
            lyrics_shown: true,
            playing: true,
        }
    }

    #[test]
    fn test_hides_after_inactivity() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        let mut c = ControlsVisibility::default();

        c.show(t0, env(), &mut w, &t);
        assert!(!c.poll(t0 + Duration::from_millis(4999), env(), &mut w, &t));
        assert!(c.poll(t0 + Duration::from_millis(5000), env(), &mut w, &t));
        assert!(!c.is_visible());
    }

    #[test]
    fn test_paused_never_hides() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        let mut c = ControlsVisibility::default();
        let paused = ControlsEnv { playing: false, ..env() };

        c.show(t0, paused, &mut w, &t);
        assert_eq!(c.hide_deadline(), None);
        assert!(!c.poll(t0 + Duration::from_secs(60), paused, &mut w, &t));
        assert!(c.is_visible());
    }

    #[test]
    fn test_pointer_move_is_throttled() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        let mut c = ControlsVisibility::default();

        c.on_activity(t0, Activity::PointerMove, env(), &mut w, &t);
        let first = c.hide_deadline();
        c.on_activity(t0 + Duration::from_millis(300), Activity::PointerMove, env(), &mut w, &t);
        assert_eq!(c.hide_deadline(), first);
        c.on_activity(t0 + Duration::from_millis(450), Activity::PointerMove, env(), &mut w, &t);
        assert_eq!(c.hide_deadline(), Some(t0 + Duration::from_millis(5450)));
    }

    #[test]
    fn test_activity_keeps_scroll_handling_live() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        let mut c = ControlsVisibility::default();

        c.on_activity(t0, Activity::PointerMove, env(), &mut w, &t);
        assert!(c.is_visible());
        assert!(!w.scroll_handling_suppressed(t0));
        assert!(!w.controls_cooling_down(t0));
        assert_eq!(c.hide_deadline(), Some(t0 + Duration::from_millis(5000)));

        // Revealing hidden controls arms the cooldown but still lets scrolls through
        assert!(c.poll(t0 + Duration::from_millis(5000), env(), &mut w, &t));
        let later = t0 + Duration::from_millis(6000);
        c.on_activity(later, Activity::Press, env(), &mut w, &t);
        assert!(c.is_visible());
        assert!(!w.scroll_handling_suppressed(later));
        assert_eq!(c.phase(later, &w), ControlsPhase::Cooldown { visible: true });
    }

    #[test]
    fn test_direction_respects_cooldown() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        let mut c = ControlsVisibility::default();

        c.apply_direction(t0, ScrollDirection::Down, env(), false, &mut w, &t);
        assert!(!c.is_visible());
        assert_eq!(c.phase(t0, &w), ControlsPhase::Cooldown { visible: false });

        // Still cooling down: the upward flick is ignored
        c.apply_direction(t0 + Duration::from_millis(200), ScrollDirection::Up, env(), false, &mut w, &t);
        assert!(!c.is_visible());

        c.apply_direction(t0 + Duration::from_millis(600), ScrollDirection::Up, env(), false, &mut w, &t);
        assert!(c.is_visible());
    }

    #[test]
    fn test_down_is_ignored_while_seeking_or_on_touch() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        let mut c = ControlsVisibility::default();

        c.apply_direction(t0, ScrollDirection::Down, env(), true, &mut w, &t);
        assert!(c.is_visible());

        let touch = ControlsEnv { pointer: PointerKind::Coarse, ..env() };
        c.apply_direction(t0, ScrollDirection::Down, touch, false, &mut w, &t);
        assert!(c.is_visible());
    }
}
