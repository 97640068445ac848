use super::ms;
use super::timings::SyncTimings;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Backward,
    Forward,
}

impl SeekDirection {
    pub fn signum(self) -> f64 {
        match self {
            SeekDirection::Backward => -1.0,
            SeekDirection::Forward => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindPhase {
    Idle,
    PendingLongPress { pressed_at: Instant },
    Rewinding { next_step_at: Instant },
}

/// What the owner should do in response to a button transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewindAction {
    /// Move the playhead by this many seconds.
    Seek(f64),
    /// Short press: go to the previous/next track.
    Skip(SeekDirection),
}

/// One ⏮ or ⏭ button: a short press skips, holding it seeks continuously.
#[derive(Debug, Clone)]
pub struct RewindButton {
    direction: SeekDirection,
    phase: RewindPhase,
    /// Clicks the host synthesizes from the same physical press are
    /// swallowed until this deadline.
    block_click_until: Option<Instant>,
}

impl RewindButton {
    pub fn new(direction: SeekDirection) -> Self {
        Self {
            direction,
            phase: RewindPhase::Idle,
            block_click_until: None,
        }
    }

    pub fn phase(&self) -> RewindPhase {
        self.phase
    }

    pub fn is_rewinding(&self) -> bool {
        matches!(self.phase, RewindPhase::Rewinding { .. })
    }

    pub fn press(&mut self, now: Instant) {
        self.phase = RewindPhase::PendingLongPress { pressed_at: now };
    }

    /// Advances the hold timers. May emit several seeks if the caller
    /// polled late.
    pub fn poll(&mut self, now: Instant, t: &SyncTimings) -> Vec<RewindAction> {
        let mut actions = Vec::new();
        if let RewindPhase::PendingLongPress { pressed_at } = self.phase {
            let threshold = pressed_at + ms(t.long_press_ms);
            if now >= threshold {
                debug!(direction = ?self.direction, "long press, rewinding");
                self.phase = RewindPhase::Rewinding {
                    next_step_at: threshold,
                };
            }
        }
        if let RewindPhase::Rewinding { mut next_step_at } = self.phase {
            while now >= next_step_at {
                actions.push(RewindAction::Seek(self.direction.signum() * t.rewind_step_secs));
                next_step_at += ms(t.rewind_interval_ms);
            }
            self.phase = RewindPhase::Rewinding { next_step_at };
        }
        actions
    }

    /// Ends the press. Seeks that fell due before `now` come first; a press
    /// that never became a hold ends in a skip.
    pub fn release(&mut self, now: Instant, t: &SyncTimings) -> Vec<RewindAction> {
        let mut actions = self.poll(now, t);
        if let RewindPhase::PendingLongPress { .. } = self.phase {
            actions.push(RewindAction::Skip(self.direction));
        }
        if !matches!(self.phase, RewindPhase::Idle) {
            self.block_click_until = Some(now + ms(t.click_block_ms));
        }
        self.phase = RewindPhase::Idle;
        actions
    }

    /// A click that did not come with press/release (keyboard activation)
    /// still skips.
    pub fn click(&mut self, now: Instant) -> Option<RewindAction> {
        if self.block_click_until.is_some_and(|until| now < until) {
            return None;
        }
        if self.is_rewinding() {
            return None;
        }
        Some(RewindAction::Skip(self.direction))
    }

    /// Pointer left the button or the owning view went away.
    pub fn cancel(&mut self) {
        self.phase = RewindPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_hold_seeks_every_interval() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut b = RewindButton::new(SeekDirection::Forward);
        b.press(t0);
        assert!(b.poll(t0 + Duration::from_millis(150), &t).is_empty());
        assert_eq!(
            b.poll(t0 + Duration::from_millis(200), &t),
            vec![RewindAction::Seek(5.0)]
        );
        assert!(b.is_rewinding());
        assert!(b.poll(t0 + Duration::from_millis(350), &t).is_empty());
        assert_eq!(
            b.poll(t0 + Duration::from_millis(400), &t),
            vec![RewindAction::Seek(5.0)]
        );
        assert!(b.release(t0 + Duration::from_millis(450), &t).is_empty());
        // The synthesized click from the same press is swallowed
        assert_eq!(b.click(t0 + Duration::from_millis(451)), None);
    }

    #[test]
    fn test_short_press_skips() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut b = RewindButton::new(SeekDirection::Backward);
        b.press(t0);
        assert!(b.poll(t0 + Duration::from_millis(80), &t).is_empty());
        assert_eq!(
            b.release(t0 + Duration::from_millis(100), &t),
            vec![RewindAction::Skip(SeekDirection::Backward)]
        );
        assert_eq!(b.click(t0 + Duration::from_millis(101)), None);
        assert_eq!(b.phase(), RewindPhase::Idle);
    }

    #[test]
    fn test_release_just_past_threshold_seeks_once() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut b = RewindButton::new(SeekDirection::Forward);
        b.press(t0);
        // No poll in between: the step due at 200ms comes out of the release
        assert_eq!(
            b.release(t0 + Duration::from_millis(250), &t),
            vec![RewindAction::Seek(5.0)]
        );
        assert_eq!(b.click(t0 + Duration::from_millis(251)), None);
    }

    #[test]
    fn test_late_poll_catches_up() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut b = RewindButton::new(SeekDirection::Backward);
        b.press(t0);
        let steps = b.poll(t0 + Duration::from_millis(650), &t);
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|s| *s == RewindAction::Seek(-5.0)));
    }

    #[test]
    fn test_keyboard_click_skips() {
        let mut b = RewindButton::new(SeekDirection::Forward);
        assert_eq!(
            b.click(Instant::now()),
            Some(RewindAction::Skip(SeekDirection::Forward))
        );
    }
}
