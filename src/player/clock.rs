use super::traits::{MediaElement, MediaEvent};
use std::time::{Duration, Instant};

const TIME_UPDATE_EVERY: Duration = Duration::from_millis(250);

/// A media element with no audio behind it: the playhead follows the wall
/// clock. Time only moves when the owner calls [`ClockMedia::advance`], so
/// the whole player can be driven from a single loop.
#[derive(Debug, Clone)]
pub struct ClockMedia {
    now: Instant,
    /// Playhead at `anchor`.
    base: f64,
    anchor: Instant,
    duration: f64,
    playing: bool,
    volume: f64,
    pending_load: Option<Option<f64>>,
    last_time_update: Instant,
    events: Vec<MediaEvent>,
}

impl ClockMedia {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            base: 0.0,
            anchor: now,
            duration: f64::NAN,
            playing: false,
            volume: 0.5,
            pending_load: None,
            last_time_update: now,
            events: Vec::new(),
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Moves the clock to `now`, queueing whatever events became due.
    pub fn advance(&mut self, now: Instant) {
        if now < self.now {
            return;
        }
        self.now = now;

        if let Some(hint) = self.pending_load.take() {
            self.duration = hint.unwrap_or(f64::NAN);
            self.events.push(MediaEvent::LoadedMetadata);
            self.events.push(MediaEvent::DurationChange);
        }

        if !self.playing {
            return;
        }
        let position = self.current_time();
        if self.duration.is_finite() && position >= self.duration {
            self.rebase(self.duration);
            self.playing = false;
            self.events.push(MediaEvent::TimeUpdate);
            self.events.push(MediaEvent::Ended);
            return;
        }
        if now.saturating_duration_since(self.last_time_update) >= TIME_UPDATE_EVERY {
            self.last_time_update = now;
            self.events.push(MediaEvent::TimeUpdate);
        }
    }

    pub fn drain_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }

    fn rebase(&mut self, position: f64) {
        self.base = position;
        self.anchor = self.now;
    }
}

impl MediaElement for ClockMedia {
    fn current_time(&self) -> f64 {
        if self.playing {
            let elapsed = self.now.saturating_duration_since(self.anchor).as_secs_f64();
            let position = self.base + elapsed;
            if self.duration.is_finite() {
                position.min(self.duration)
            } else {
                position
            }
        } else {
            self.base
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        let upper = if self.duration.is_finite() {
            self.duration
        } else {
            f64::MAX
        };
        self.rebase(seconds.clamp(0.0, upper));
        self.events.push(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) {
        if !self.playing {
            let position = self.current_time();
            self.rebase(position);
            self.playing = true;
            self.last_time_update = self.now;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            let position = self.current_time();
            self.rebase(position);
            self.playing = false;
        }
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn load(&mut self, duration_hint: Option<f64>) {
        self.playing = false;
        self.duration = f64::NAN;
        self.rebase(0.0);
        self.pending_load = Some(duration_hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_arrives_after_load() {
        let t0 = Instant::now();
        let mut m = ClockMedia::new(t0);
        m.load(Some(30.0));
        assert!(m.duration().is_nan());
        m.advance(t0 + Duration::from_millis(16));
        assert_eq!(m.duration(), 30.0);
        assert_eq!(
            m.drain_events(),
            vec![MediaEvent::LoadedMetadata, MediaEvent::DurationChange]
        );
    }

    #[test]
    fn test_clock_follows_time_and_ends() {
        let t0 = Instant::now();
        let mut m = ClockMedia::new(t0);
        m.load(Some(2.0));
        m.advance(t0);
        m.drain_events();
        m.play();

        m.advance(t0 + Duration::from_millis(1500));
        assert!((m.current_time() - 1.5).abs() < 1e-9);
        assert_eq!(m.drain_events(), vec![MediaEvent::TimeUpdate]);

        m.advance(t0 + Duration::from_millis(2100));
        assert_eq!(m.current_time(), 2.0);
        assert!(m.is_paused());
        assert!(m.drain_events().contains(&MediaEvent::Ended));
    }

    #[test]
    fn test_seek_clamps_and_pause_freezes() {
        let t0 = Instant::now();
        let mut m = ClockMedia::new(t0);
        m.load(Some(10.0));
        m.advance(t0);
        m.set_current_time(42.0);
        assert_eq!(m.current_time(), 10.0);
        m.set_current_time(3.0);
        m.play();
        m.advance(t0 + Duration::from_secs(1));
        m.pause();
        m.advance(t0 + Duration::from_secs(5));
        assert!((m.current_time() - 4.0).abs() < 1e-9);
    }
}
