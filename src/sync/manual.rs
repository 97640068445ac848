use super::controls::{ControlsEnv, ControlsVisibility};
use super::scroll_state::{OpacityMode, ScrollDirection, ScrollState, SuppressionWindows};
use super::timings::SyncTimings;
use super::viewport::ScrollContainer;
use super::{ms, PointerKind};
use std::time::Instant;
use tracing::debug;

/// Shared state a scroll event is interpreted against.
pub struct ScrollContext<'a> {
    pub state: &'a mut ScrollState,
    pub windows: &'a mut SuppressionWindows,
    pub controls: &'a mut ControlsVisibility,
    pub env: ControlsEnv,
    pub seeking: bool,
    pub timings: &'a SyncTimings,
}

impl ScrollContext<'_> {
    fn seek_blocked(&self, now: Instant) -> bool {
        self.seeking || self.windows.seek_protected(now)
    }

    /// Direction reaction shared by the immediate and the debounced check.
    fn react(&mut self, now: Instant, direction: ScrollDirection, near_sticky: bool) -> bool {
        let visible = self.controls.is_visible();
        let changed = self.state.last_scroll_direction != Some(direction);
        let inconsistent = match direction {
            ScrollDirection::Down => visible,
            ScrollDirection::Up => !visible,
        };
        if direction == ScrollDirection::Up && near_sticky {
            return false;
        }
        if !(changed || inconsistent) {
            return false;
        }
        let blocked = self.seek_blocked(now);
        self.controls
            .apply_direction(now, direction, self.env, blocked, self.windows, self.timings);
        self.state.last_scroll_direction = Some(direction);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Programmatic echo, restore settle or a suppression window.
    Ignored,
    /// A genuine user scroll; any running autoscroll animation must stop.
    User,
}

/// Tells user scrolls apart from our own and turns them into deference,
/// direction and end-of-content signals.
#[derive(Debug, Clone, Default)]
pub struct ManualScrollInterpreter {
    last_scroll_top: f64,
    gesture_start: f64,
    final_check_at: Option<Instant>,
    opacity_reset_at: Option<Instant>,
}

impl ManualScrollInterpreter {
    pub fn last_scroll_top(&self) -> f64 {
        self.last_scroll_top
    }

    /// A scroll event we caused. Keeps deltas measured from where the
    /// content really is.
    pub fn ignore(&mut self, top: f64) {
        self.last_scroll_top = top;
        self.gesture_start = top;
    }

    pub fn process<C: ScrollContainer>(
        &mut self,
        now: Instant,
        container: &C,
        ctx: &mut ScrollContext<'_>,
    ) -> ScrollOutcome {
        let t = ctx.timings;
        let top = container.scroll_top();

        if ctx.windows.scroll_handling_suppressed(now)
            || ctx.seek_blocked(now)
            || ctx.state.is_restoring(now)
        {
            self.ignore(top);
            return ScrollOutcome::Ignored;
        }
        if ctx.state.is_just_restored(now) {
            let echo = ctx.state.since_user_scroll(now) < ms(t.restore_echo_ms)
                && (top - ctx.state.saved_scroll_top).abs() < t.restore_echo_px;
            if echo {
                self.ignore(top);
                return ScrollOutcome::Ignored;
            }
            ctx.state.just_restored_until = None;
        }

        let coarse = ctx.env.pointer == PointerKind::Coarse;
        if coarse {
            ctx.controls.schedule_hide(now, ctx.env, t);
        }

        let at_end = top + container.client_height() >= container.scroll_height() - t.end_threshold_px;
        let distance = container.distance_from_bottom();
        let near_sticky = distance <= t.sticky_end_px;
        let delta = top - self.last_scroll_top;
        if self.final_check_at.is_none() {
            // First event of a gesture anchors the debounced check
            self.gesture_start = self.last_scroll_top;
        }

        ctx.state.user_scroll_at = Some(now);
        ctx.state.is_user_scrolling = true;
        ctx.state.saved_scroll_top = top;
        if at_end {
            ctx.state.user_scrolled_to_end = true;
        } else if ctx.state.user_scrolled_to_end && distance > t.sticky_end_px {
            ctx.state.user_scrolled_to_end = false;
        }
        ctx.state.opacity = OpacityMode::UserScrolling;

        if !coarse && delta.abs() > t.direction_immediate_px {
            let direction = if delta > 0.0 {
                ScrollDirection::Down
            } else {
                ScrollDirection::Up
            };
            if ctx.react(now, direction, near_sticky) {
                debug!(?direction, delta, "scroll direction reaction");
            }
        }

        self.last_scroll_top = top;
        self.final_check_at = Some(now + ms(t.direction_debounce_ms));
        self.opacity_reset_at = Some(now + ms(t.manual_deference_ms));
        ScrollOutcome::User
    }

    /// Runs the debounced direction check and the opacity countdown.
    pub fn poll<C: ScrollContainer>(&mut self, now: Instant, container: &C, ctx: &mut ScrollContext<'_>) {
        let t = ctx.timings;
        if self.final_check_at.is_some_and(|at| now >= at) {
            self.final_check_at = None;
            let top = container.scroll_top();
            let total = top - self.gesture_start;
            if ctx.env.pointer != PointerKind::Coarse && total.abs() > t.direction_final_px {
                let direction = if total > 0.0 {
                    ScrollDirection::Down
                } else {
                    ScrollDirection::Up
                };
                let skip = ctx.seeking && direction == ScrollDirection::Down;
                if !skip {
                    let near_sticky = container.distance_from_bottom() <= t.sticky_end_px;
                    ctx.react(now, direction, near_sticky);
                }
            }
            self.gesture_start = top;
        }

        if self.opacity_reset_at.is_some_and(|at| now >= at) {
            self.opacity_reset_at = None;
            if ctx.state.opacity == OpacityMode::UserScrolling {
                ctx.state.opacity = OpacityMode::Normal;
            }
            ctx.state.is_user_scrolling = false;
        }
    }

    /// Track change or view teardown.
    pub fn reset(&mut self, top: f64) {
        *self = Self::default();
        self.ignore(top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::viewport::testing::FakeContainer;
    use std::time::Duration;

    struct Fixture {
        state: ScrollState,
        windows: SuppressionWindows,
        controls: ControlsVisibility,
        timings: SyncTimings,
        env: ControlsEnv,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                state: ScrollState::default(),
                windows: SuppressionWindows::default(),
                controls: ControlsVisibility::default(),
                timings: SyncTimings::default(),
                env: ControlsEnv {
                    pointer: PointerKind::Fine,
                    lyrics_shown: true,
                    playing: true,
                },
            }
        }

        fn ctx(&mut self) -> ScrollContext<'_> {
            ScrollContext {
                state: &mut self.state,
                windows: &mut self.windows,
                controls: &mut self.controls,
                env: self.env,
                seeking: false,
                timings: &self.timings,
            }
        }
    }

    #[test]
    fn test_downward_scroll_hides_controls() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        let mut c = FakeContainer::with_lines(50, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        c.user_scroll(120.0);
        assert_eq!(m.process(t0, &c, &mut f.ctx()), ScrollOutcome::User);
        assert!(!f.controls.is_visible());
        assert_eq!(f.state.opacity, OpacityMode::UserScrolling);
        assert_eq!(f.state.saved_scroll_top, 120.0);
        assert_eq!(f.state.last_scroll_direction, Some(ScrollDirection::Down));
    }

    #[test]
    fn test_suppressed_events_only_track_position() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        f.windows.protect_seek(t0, Duration::from_millis(2000));
        let mut c = FakeContainer::with_lines(50, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        c.user_scroll(300.0);
        assert_eq!(m.process(t0, &c, &mut f.ctx()), ScrollOutcome::Ignored);
        assert_eq!(m.last_scroll_top(), 300.0);
        assert_eq!(f.state.user_scroll_at, None);
    }

    #[test]
    fn test_end_flag_sticks_until_leaving_threshold() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        let mut c = FakeContainer::with_lines(20, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        c.user_scroll(400.0);
        m.process(t0, &c, &mut f.ctx());
        assert!(f.state.user_scrolled_to_end);

        // 20px above the end is still inside the sticky zone
        c.user_scroll(380.0);
        m.process(t0 + Duration::from_millis(600), &c, &mut f.ctx());
        assert!(f.state.user_scrolled_to_end);

        c.user_scroll(300.0);
        m.process(t0 + Duration::from_millis(700), &c, &mut f.ctx());
        assert!(!f.state.user_scrolled_to_end);
    }

    #[test]
    fn test_opacity_returns_after_deference() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        let mut c = FakeContainer::with_lines(50, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        c.user_scroll(80.0);
        m.process(t0, &c, &mut f.ctx());
        m.poll(t0 + Duration::from_millis(1999), &c, &mut f.ctx());
        assert_eq!(f.state.opacity, OpacityMode::UserScrolling);
        m.poll(t0 + Duration::from_millis(2000), &c, &mut f.ctx());
        assert_eq!(f.state.opacity, OpacityMode::Normal);
        assert!(!f.state.is_user_scrolling);
    }

    /// Feeds a steady stream of small scroll steps, polling like a frame loop.
    fn drag(
        m: &mut ManualScrollInterpreter,
        c: &mut FakeContainer,
        f: &mut Fixture,
        from: Instant,
        start: f64,
        step: f64,
        count: u32,
    ) -> Instant {
        let mut at = from;
        for i in 1..=count {
            at = from + Duration::from_millis(16 * u64::from(i));
            c.user_scroll(start + step * f64::from(i));
            m.process(at, c, &mut f.ctx());
            m.poll(at, c, &mut f.ctx());
        }
        at
    }

    #[test]
    fn test_slow_downward_drag_hides_on_final_check() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        let mut c = FakeContainer::with_lines(50, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        // Every step is below the immediate threshold
        let last = drag(&mut m, &mut c, &mut f, t0, 0.0, 1.0, 40);
        assert!(f.controls.is_visible());
        assert_eq!(f.state.last_scroll_direction, None);

        m.poll(last + Duration::from_millis(250), &c, &mut f.ctx());
        assert!(!f.controls.is_visible());
        assert_eq!(f.state.last_scroll_direction, Some(ScrollDirection::Down));
    }

    #[test]
    fn test_slow_upward_drag_shows_on_final_check() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        let mut c = FakeContainer::with_lines(50, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        c.user_scroll(200.0);
        m.process(t0, &c, &mut f.ctx());
        m.poll(t0 + Duration::from_millis(200), &c, &mut f.ctx());
        assert!(!f.controls.is_visible());

        // Once the hide cooldown is over, creep back up 2px at a time
        let last = drag(&mut m, &mut c, &mut f, t0 + Duration::from_millis(600), 200.0, -2.0, 20);
        assert!(!f.controls.is_visible());

        m.poll(last + Duration::from_millis(250), &c, &mut f.ctx());
        assert!(f.controls.is_visible());
        assert_eq!(f.state.last_scroll_direction, Some(ScrollDirection::Up));
    }

    #[test]
    fn test_restore_echo_is_swallowed() {
        let t0 = Instant::now();
        let mut f = Fixture::new();
        f.state.saved_scroll_top = 160.0;
        f.state.user_scroll_at = Some(t0);
        f.state.just_restored_until = Some(t0 + Duration::from_millis(1100));
        let mut c = FakeContainer::with_lines(50, 40.0, 400.0);
        let mut m = ManualScrollInterpreter::default();

        c.user_scroll(164.0);
        assert_eq!(
            m.process(t0 + Duration::from_millis(200), &c, &mut f.ctx()),
            ScrollOutcome::Ignored
        );

        c.user_scroll(400.0);
        assert_eq!(
            m.process(t0 + Duration::from_millis(300), &c, &mut f.ctx()),
            ScrollOutcome::User
        );
        assert_eq!(f.state.just_restored_until, None);
    }
}
