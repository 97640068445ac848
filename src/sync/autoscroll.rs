use super::scroll_state::{AutoscrollMode, ScrollState};
use super::timings::SyncTimings;
use super::viewport::{ScrollBehavior, ScrollContainer, TaggedContainer};
use super::{ms, ScrollStrategy};
use crate::lyrics::LyricsLine;
use std::time::{Duration, Instant};
use tracing::debug;

// Layout sanity limits. A line box outside these is mid-layout garbage.
const MIN_SCROLLABLE_PX: f64 = 100.0;
const MAX_OVERSHOOT_PX: f64 = 1000.0;
const MAX_LINE_JUMP_PX: f64 = 500.0;
const LAYOUT_CHECK_LINES: usize = 3;
const NEAR_START_SECS: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl Animation {
    fn position(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let total = self.duration.as_secs_f64();
        let p = if total > 0.0 { (elapsed / total).min(1.0) } else { 1.0 };
        (self.from + (self.to - self.from) * ease_out_cubic(p), p >= 1.0)
    }
}

pub fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

/// Why a tick left the viewport alone. Only used for tracing and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    Hidden,
    Restoring,
    Gap,
    Layout,
    Deferred,
    ParkedAtEnd,
    Throttled,
    ParkedAhead,
    InPlace,
}

/// Moves the viewport so the active line sits near the top.
#[derive(Debug, Clone)]
pub struct AutoscrollController {
    strategy: ScrollStrategy,
    last_auto_scroll: Option<Instant>,
    animation: Option<Animation>,
}

impl AutoscrollController {
    pub fn new(strategy: ScrollStrategy) -> Self {
        Self {
            strategy,
            last_auto_scroll: None,
            animation: None,
        }
    }

    pub fn strategy(&self) -> ScrollStrategy {
        self.strategy
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn cancel(&mut self) {
        self.animation = None;
    }

    fn throttled(&self, now: Instant, t: &SyncTimings) -> bool {
        self.last_auto_scroll
            .is_some_and(|at| now.saturating_duration_since(at) < ms(t.autoscroll_throttle_ms))
    }

    /// Scrolls toward `target` with the configured strategy.
    pub fn smooth_scroll<C: ScrollContainer>(
        &mut self,
        now: Instant,
        container: &mut TaggedContainer<C>,
        target: f64,
        state: &ScrollState,
        t: &SyncTimings,
    ) {
        if state.is_restoring(now) {
            return;
        }
        match self.strategy {
            ScrollStrategy::Native => {
                container.scroll_to(now, target, ScrollBehavior::Smooth);
                self.last_auto_scroll = Some(now);
            }
            ScrollStrategy::Eased => {
                if self.animation.is_some_and(|a| (a.to - target).abs() < 1.0) {
                    return;
                }
                self.animation = Some(Animation {
                    from: container.get().scroll_top(),
                    to: target,
                    started: now,
                    duration: ms(t.scroll_animation_ms),
                });
            }
        }
    }

    /// Advances the eased animation by one frame.
    pub fn step<C: ScrollContainer>(&mut self, now: Instant, container: &mut TaggedContainer<C>) {
        let Some(animation) = self.animation else {
            return;
        };
        let (top, done) = animation.position(now);
        container.scroll_to(now, top, ScrollBehavior::Instant);
        if done {
            self.animation = None;
            self.last_auto_scroll = Some(now);
        }
    }

    /// One autoscroll decision for the current playback time. Returns the
    /// target when a scroll was started.
    #[allow(clippy::too_many_arguments)]
    pub fn tick<C: ScrollContainer>(
        &mut self,
        now: Instant,
        container: &mut TaggedContainer<C>,
        lines: &[LyricsLine],
        active: Option<usize>,
        time: f64,
        lyrics_shown: bool,
        state: &mut ScrollState,
        t: &SyncTimings,
    ) -> Result<f64, Hold> {
        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return Err(Hold::Hidden);
        };
        if !lyrics_shown {
            return Err(Hold::Hidden);
        }
        let mode = state.mode(now, ms(t.manual_deference_ms));
        if mode == AutoscrollMode::Restoring {
            return Err(Hold::Restoring);
        }
        let since = state.since_user_scroll(now);

        let Some(index) = active else {
            if time < first.start_time {
                if mode == AutoscrollMode::Deferred {
                    return Err(Hold::Deferred);
                }
                if self.throttled(now, t) {
                    return Err(Hold::Throttled);
                }
                if container.get().scroll_top() < 1.0 && self.animation.is_none() {
                    return Err(Hold::InPlace);
                }
                debug!("before first line, scrolling to top");
                self.smooth_scroll(now, container, 0.0, state, t);
                return Ok(0.0);
            }
            return Err(Hold::Gap);
        };

        let view = container.get();
        let line = match view.line_box(index) {
            Some(b) if b.height > 0.0 => b,
            _ => return Err(Hold::Layout),
        };
        if mode == AutoscrollMode::Deferred {
            return Err(Hold::Deferred);
        }

        let top = view.scroll_top();
        let client = view.client_height();
        let height = view.scroll_height();

        if state.user_scrolled_to_end {
            let still_at_end = top + client >= height - t.end_threshold_px;
            let lyrics_running = time < last.end_time.unwrap_or(f64::INFINITY);
            if still_at_end && lyrics_running && since < ms(t.override_grace_ms) {
                return Err(Hold::ParkedAtEnd);
            }
            state.user_scrolled_to_end = false;
        }
        if self.throttled(now, t) {
            return Err(Hold::Throttled);
        }
        state.is_user_scrolling = false;

        if height <= client || height < MIN_SCROLLABLE_PX {
            return Err(Hold::Layout);
        }
        if line.top > height + MAX_OVERSHOOT_PX {
            return Err(Hold::Layout);
        }
        if index > 0 {
            if let Some(prev) = view.line_box(index - 1) {
                if line.top - prev.top > MAX_LINE_JUMP_PX {
                    return Err(Hold::Layout);
                }
            }
        }
        if index > LAYOUT_CHECK_LINES && !layout_settled(view) {
            return Err(Hold::Layout);
        }

        let top_offset = (client * t.top_offset_ratio).min(t.top_offset_cap_px);
        let bottom_offset = (client * t.bottom_offset_ratio).min(t.bottom_offset_cap_px);
        let desired = (line.top - top_offset).max(0.0).min(view.max_scroll_top());

        if time < first.start_time + NEAR_START_SECS && desired - top > 2.0 * client {
            return Err(Hold::Layout);
        }

        let correct = (line.top - top - top_offset).abs() <= t.position_tolerance_px;
        let visible = line.top + line.height <= top + client - bottom_offset;

        if top > desired + t.user_ahead_px && since < ms(t.override_grace_ms) {
            return Err(Hold::ParkedAhead);
        }
        if correct && visible {
            return Err(Hold::InPlace);
        }

        debug!(index, from = top, to = desired, "autoscroll");
        self.smooth_scroll(now, container, desired, state, t);
        Ok(desired)
    }

    pub fn reset(&mut self) {
        self.animation = None;
        self.last_auto_scroll = None;
    }
}

/// The first few lines must be laid out in order before deeper targets
/// can be trusted.
fn layout_settled<C: ScrollContainer>(view: &C) -> bool {
    let mut prev = f64::NEG_INFINITY;
    for i in 0..LAYOUT_CHECK_LINES {
        match view.line_box(i) {
            Some(b) if b.height > 0.0 && b.top >= prev => prev = b.top,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::viewport::testing::FakeContainer;

    fn lines(n: usize) -> Vec<LyricsLine> {
        (0..n)
            .map(|i| LyricsLine::new(format!("line {i}"), 10.0 + i as f64 * 4.0))
            .collect()
    }

    fn container() -> TaggedContainer<FakeContainer> {
        TaggedContainer::new(
            FakeContainer::with_lines(30, 40.0, 400.0),
            Duration::from_millis(300),
            Duration::from_millis(300),
        )
    }

    #[test]
    fn test_scrolls_active_line_to_offset() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState::default();
        let mut a = AutoscrollController::new(ScrollStrategy::Native);
        let ls = lines(30);

        // Line 12 sits at 480; offset is min(400 * 0.25, 120) = 100
        let target = a.tick(t0, &mut c, &ls, Some(12), 58.0, true, &mut state, &t);
        assert_eq!(target, Ok(380.0));
        assert_eq!(c.get().scroll_calls, vec![(380.0, ScrollBehavior::Smooth)]);

        // Already in place on the next tick
        let again = a.tick(t0 + Duration::from_millis(100), &mut c, &ls, Some(12), 58.2, true, &mut state, &t);
        assert_eq!(again, Err(Hold::InPlace));
    }

    #[test]
    fn test_defers_and_throttles() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState::default();
        let mut a = AutoscrollController::new(ScrollStrategy::Native);
        let ls = lines(30);

        state.user_scroll_at = Some(t0);
        assert_eq!(
            a.tick(t0 + Duration::from_millis(1500), &mut c, &ls, Some(12), 58.0, true, &mut state, &t),
            Err(Hold::Deferred)
        );
        state.user_scroll_at = None;
        assert!(a.tick(t0, &mut c, &ls, Some(12), 58.0, true, &mut state, &t).is_ok());
        assert_eq!(
            a.tick(t0 + Duration::from_millis(20), &mut c, &ls, Some(20), 90.0, true, &mut state, &t),
            Err(Hold::Throttled)
        );
    }

    #[test]
    fn test_parked_ahead_until_grace_ends() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState::default();
        let mut a = AutoscrollController::new(ScrollStrategy::Native);
        let ls = lines(30);

        c.get_mut().user_scroll(700.0);
        state.user_scroll_at = Some(t0);
        assert_eq!(
            a.tick(t0 + Duration::from_millis(2500), &mut c, &ls, Some(5), 30.0, true, &mut state, &t),
            Err(Hold::ParkedAhead)
        );
        assert_eq!(
            a.tick(t0 + Duration::from_millis(3500), &mut c, &ls, Some(5), 30.0, true, &mut state, &t),
            Ok(100.0)
        );
    }

    #[test]
    fn test_parked_at_end_waits_for_grace() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState::default();
        let mut a = AutoscrollController::new(ScrollStrategy::Native);
        let ls = lines(30);

        c.get_mut().user_scroll(800.0);
        state.user_scroll_at = Some(t0);
        state.user_scrolled_to_end = true;
        assert_eq!(
            a.tick(t0 + Duration::from_millis(2100), &mut c, &ls, Some(10), 50.0, true, &mut state, &t),
            Err(Hold::ParkedAtEnd)
        );
        assert!(a
            .tick(t0 + Duration::from_millis(3600), &mut c, &ls, Some(10), 50.0, true, &mut state, &t)
            .is_ok());
        assert!(!state.user_scrolled_to_end);
    }

    #[test]
    fn test_before_first_line_returns_to_top() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState::default();
        let mut a = AutoscrollController::new(ScrollStrategy::Native);
        let ls = lines(30);

        c.get_mut().user_scroll(240.0);
        assert_eq!(a.tick(t0, &mut c, &ls, None, 2.0, true, &mut state, &t), Ok(0.0));
        assert_eq!(c.get().scroll_top(), 0.0);
        // A gap between lines leaves the viewport alone
        assert_eq!(
            a.tick(t0 + Duration::from_millis(100), &mut c, &ls, None, 20.0, true, &mut state, &t),
            Err(Hold::Gap)
        );
    }

    #[test]
    fn test_eased_animation_interpolates() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState::default();
        let mut a = AutoscrollController::new(ScrollStrategy::Eased);
        let ls = lines(30);

        assert_eq!(a.tick(t0, &mut c, &ls, Some(12), 58.0, true, &mut state, &t), Ok(380.0));
        assert!(a.is_animating());

        a.step(t0 + Duration::from_millis(150), &mut c);
        let mid = c.get().scroll_top();
        // Ease-out covers 87.5% of the distance at the halfway point
        assert!((mid - 380.0 * 0.875).abs() < 1e-6);

        // Same target while in flight does not restart the animation
        a.smooth_scroll(t0 + Duration::from_millis(160), &mut c, 380.0, &state, &t);
        a.step(t0 + Duration::from_millis(300), &mut c);
        assert_eq!(c.get().scroll_top(), 380.0);
        assert!(!a.is_animating());
    }

    #[test]
    fn test_restoring_blocks_everything() {
        let t = SyncTimings::default();
        let t0 = Instant::now();
        let mut c = container();
        let mut state = ScrollState {
            restoring_until: Some(t0 + Duration::from_millis(100)),
            ..ScrollState::default()
        };
        let mut a = AutoscrollController::new(ScrollStrategy::Native);
        assert_eq!(
            a.tick(t0, &mut c, &lines(30), Some(12), 58.0, true, &mut state, &t),
            Err(Hold::Restoring)
        );
        assert!(c.get().scroll_calls.is_empty());
    }
}
