use std::time::{Duration, Instant};

/// Vertical extent of one rendered lyric line inside the scroll content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBox {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// The scrolling element the transcript lives in.
///
/// Positions are in the container's own units. `line_box` returns `None` for
/// lines that are not laid out yet.
pub trait ScrollContainer {
    fn scroll_top(&self) -> f64;
    fn client_height(&self) -> f64;
    fn scroll_height(&self) -> f64;
    fn line_box(&self, index: usize) -> Option<LineBox>;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    fn max_scroll_top(&self) -> f64 {
        (self.scroll_height() - self.client_height()).max(0.0)
    }

    fn distance_from_bottom(&self) -> f64 {
        (self.scroll_height() - self.client_height() - self.scroll_top()).max(0.0)
    }
}

/// Wraps a container so scrolls issued by the app are told apart from the
/// user's: every `scroll_to` through the wrapper opens a short window during
/// which scroll events count as programmatic.
#[derive(Debug)]
pub struct TaggedContainer<C> {
    inner: C,
    programmatic_until: Option<Instant>,
    listening_since: Option<Instant>,
    window: Duration,
    grace: Duration,
}

impl<C: ScrollContainer> TaggedContainer<C> {
    pub fn new(inner: C, window: Duration, grace: Duration) -> Self {
        Self {
            inner,
            programmatic_until: None,
            listening_since: None,
            window,
            grace,
        }
    }

    pub fn get(&self) -> &C {
        &self.inner
    }

    /// Direct access for the host; scrolls made here are the user's.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn scroll_to(&mut self, now: Instant, top: f64, behavior: ScrollBehavior) {
        self.programmatic_until = Some(now + self.window);
        self.inner.scroll_to(top, behavior);
    }

    pub fn is_programmatic(&self, now: Instant) -> bool {
        self.programmatic_until.is_some_and(|until| now < until)
    }

    /// Starts listening for scroll events; the first moments are ignored
    /// because the initial layout scrolls on its own.
    pub fn listen(&mut self, now: Instant) {
        self.listening_since = Some(now);
    }

    pub fn stop_listening(&mut self) {
        self.listening_since = None;
    }

    /// Whether a scroll event at `now` should reach the interpreter at all.
    pub fn accepts_events(&self, now: Instant) -> bool {
        match self.listening_since {
            Some(since) => now >= since + self.grace && !self.is_programmatic(now),
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory container with fixed-height lines.
    #[derive(Debug, Clone)]
    pub struct FakeContainer {
        pub top: f64,
        pub client: f64,
        pub lines: Vec<LineBox>,
        pub padding_bottom: f64,
        pub scroll_calls: Vec<(f64, ScrollBehavior)>,
    }

    impl FakeContainer {
        pub fn with_lines(count: usize, line_height: f64, client: f64) -> Self {
            let lines = (0..count)
                .map(|i| LineBox {
                    top: i as f64 * line_height,
                    height: line_height,
                })
                .collect();
            Self {
                top: 0.0,
                client,
                lines,
                padding_bottom: 0.0,
                scroll_calls: Vec::new(),
            }
        }

        pub fn user_scroll(&mut self, top: f64) {
            self.top = top.clamp(0.0, self.max_scroll_top());
        }
    }

    impl ScrollContainer for FakeContainer {
        fn scroll_top(&self) -> f64 {
            self.top
        }

        fn client_height(&self) -> f64 {
            self.client
        }

        fn scroll_height(&self) -> f64 {
            self.lines
                .last()
                .map(|l| l.top + l.height)
                .unwrap_or(0.0)
                + self.padding_bottom
        }

        fn line_box(&self, index: usize) -> Option<LineBox> {
            self.lines.get(index).copied()
        }

        fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
            self.scroll_calls.push((top, behavior));
            self.top = top.clamp(0.0, self.max_scroll_top());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeContainer;
    use super::*;

    #[test]
    fn test_programmatic_window_and_grace() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut c = TaggedContainer::new(FakeContainer::with_lines(20, 40.0, 200.0), ms(300), ms(300));
        assert!(!c.accepts_events(t0));

        c.listen(t0);
        assert!(!c.accepts_events(t0 + ms(299)));
        assert!(c.accepts_events(t0 + ms(300)));

        c.scroll_to(t0 + ms(400), 120.0, ScrollBehavior::Smooth);
        assert_eq!(c.get().scroll_top(), 120.0);
        assert!(!c.accepts_events(t0 + ms(650)));
        assert!(c.accepts_events(t0 + ms(700)));
    }
}
