use std::time::{Duration, Instant};

/// How the transcript is tinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpacityMode {
    #[default]
    Normal,
    UserScrolling,
    Seeking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Who currently owns the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoscrollMode {
    /// Autoscroll tracks the active line.
    Following,
    /// The user scrolled recently; autoscroll waits.
    Deferred,
    /// A saved position is being put back; nothing else may scroll.
    Restoring,
}

/// Per-mount scroll bookkeeping shared by the manual-scroll interpreter and
/// the autoscroll controller.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub saved_scroll_top: f64,
    pub is_user_scrolling: bool,
    pub last_scroll_direction: Option<ScrollDirection>,
    pub opacity: OpacityMode,
    pub user_scrolled_to_end: bool,
    /// Last genuine user scroll. `None` reads as "long ago".
    pub user_scroll_at: Option<Instant>,
    pub restoring_until: Option<Instant>,
    pub just_restored_until: Option<Instant>,
}

impl ScrollState {
    pub fn since_user_scroll(&self, now: Instant) -> Duration {
        self.user_scroll_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or(Duration::MAX)
    }

    pub fn is_restoring(&self, now: Instant) -> bool {
        self.restoring_until.is_some_and(|until| now < until)
    }

    pub fn is_just_restored(&self, now: Instant) -> bool {
        self.just_restored_until.is_some_and(|until| now < until)
    }

    pub fn mode(&self, now: Instant, deference: Duration) -> AutoscrollMode {
        if self.is_restoring(now) || self.is_just_restored(now) {
            AutoscrollMode::Restoring
        } else if self.since_user_scroll(now) < deference {
            AutoscrollMode::Deferred
        } else {
            AutoscrollMode::Following
        }
    }

    /// Track change: nothing carries over except a zero saved position.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Deadlines that temporarily switch off a class of reactions.
#[derive(Debug, Clone, Default)]
pub struct SuppressionWindows {
    pub scroll_handling_until: Option<Instant>,
    pub seek_protection_until: Option<Instant>,
    pub controls_cooldown_until: Option<Instant>,
}

fn open(until: Option<Instant>, now: Instant) -> bool {
    until.is_some_and(|u| now < u)
}

impl SuppressionWindows {
    pub fn scroll_handling_suppressed(&self, now: Instant) -> bool {
        open(self.scroll_handling_until, now)
    }

    pub fn seek_protected(&self, now: Instant) -> bool {
        open(self.seek_protection_until, now)
    }

    pub fn controls_cooling_down(&self, now: Instant) -> bool {
        open(self.controls_cooldown_until, now)
    }

    pub fn suppress_scroll_handling(&mut self, now: Instant, window: Duration) {
        self.scroll_handling_until = Some(now + window);
    }

    pub fn protect_seek(&mut self, now: Instant, window: Duration) {
        self.seek_protection_until = Some(now + window);
    }

    pub fn cool_down_controls(&mut self, now: Instant, window: Duration) {
        self.controls_cooldown_until = Some(now + window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_deadlines() {
        let t0 = Instant::now();
        let mut s = ScrollState::default();
        let deference = Duration::from_millis(2000);
        assert_eq!(s.mode(t0, deference), AutoscrollMode::Following);

        s.user_scroll_at = Some(t0);
        assert_eq!(s.mode(t0 + Duration::from_millis(1999), deference), AutoscrollMode::Deferred);
        assert_eq!(s.mode(t0 + Duration::from_millis(2000), deference), AutoscrollMode::Following);

        s.just_restored_until = Some(t0 + Duration::from_millis(1100));
        assert_eq!(s.mode(t0 + Duration::from_millis(50), deference), AutoscrollMode::Restoring);
    }

    #[test]
    fn test_windows_expire() {
        let t0 = Instant::now();
        let mut w = SuppressionWindows::default();
        assert!(!w.seek_protected(t0));
        w.protect_seek(t0, Duration::from_millis(2000));
        assert!(w.seek_protected(t0 + Duration::from_millis(1999)));
        assert!(!w.seek_protected(t0 + Duration::from_millis(2000)));
    }
}
