use super::traits::RepeatMode;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// Play order over an album's tracks. Holds track indices only.
#[derive(Debug, Clone)]
pub struct Playlist {
    order: Vec<usize>,
    position: usize,
    repeat: RepeatMode,
    shuffle: bool,
    last_advance_at: Option<Instant>,
}

impl Playlist {
    pub fn new(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
            position: 0,
            repeat: RepeatMode::None,
            shuffle: false,
            last_advance_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Track index of the current entry.
    pub fn current(&self) -> Option<usize> {
        self.order.get(self.position).copied()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.order.len()
    }

    /// Jumps to a track by index.
    pub fn select(&mut self, track: usize) -> Option<usize> {
        let pos = self.order.iter().position(|&t| t == track)?;
        self.position = pos;
        Some(track)
    }

    /// Next entry, wrapping. Calls inside `guard` of the previous advance
    /// are dropped so a double-fired `ended` does not skip two tracks.
    pub fn next(&mut self, now: Instant, guard: Duration) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        if self
            .last_advance_at
            .is_some_and(|at| now.saturating_duration_since(at) < guard)
        {
            return None;
        }
        self.last_advance_at = Some(now);
        self.position = (self.position + 1) % self.order.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        self.position = (self.position + self.order.len() - 1) % self.order.len();
        self.current()
    }

    /// Shuffle keeps the current track playing at the head of the new order;
    /// turning it off restores album order at the current track.
    pub fn set_shuffle<R: Rng + ?Sized>(&mut self, enabled: bool, rng: &mut R) {
        self.shuffle = enabled;
        let current = self.current();
        if enabled {
            let mut rest: Vec<usize> = self
                .order
                .iter()
                .copied()
                .filter(|&t| Some(t) != current)
                .collect();
            rest.shuffle(rng);
            self.order = current.into_iter().chain(rest).collect();
            self.position = 0;
        } else {
            self.order.sort_unstable();
            self.position = current
                .and_then(|c| self.order.iter().position(|&t| t == c))
                .unwrap_or(0);
        }
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = !self.shuffle;
        self.set_shuffle(enabled, &mut rand::rng());
        enabled
    }
}
