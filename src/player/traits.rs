use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Playing,
    Paused,
}

/// Repeat mode. Cycles `None -> All -> One -> None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    All,
    One,
}

impl RepeatMode {
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::None => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

/// Events the media element reports back to its owner 🎵
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata,
    DurationChange,
    TimeUpdate,
    Ended,
}

/// The single audio element a player session drives.
///
/// `duration` is `NaN` until metadata is known.
pub trait MediaElement {
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn duration(&self) -> f64;
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// 0.0 ..= 1.0
    fn set_volume(&mut self, volume: f64);
    /// Loads a new source. Metadata arrives later through `LoadedMetadata`.
    fn load(&mut self, duration_hint: Option<f64>);

    fn state(&self) -> PlayerState {
        if self.is_paused() {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_cycle() {
        let mut mode = RepeatMode::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(seen, vec![RepeatMode::All, RepeatMode::One, RepeatMode::None]);
    }
}
