//! The playback synchronizer: keeps the lyrics viewport in step with the
//! audio clock without fighting the user.

pub mod autoscroll;
pub mod controls;
pub mod manual;
pub mod rewind;
pub mod scroll_state;
pub mod session;
pub mod timings;
pub mod viewport;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use autoscroll::AutoscrollController;
pub use controls::{Activity, ControlsEnv, ControlsPhase, ControlsVisibility};
pub use manual::ManualScrollInterpreter;
pub use rewind::{RewindAction, RewindButton, RewindPhase, SeekDirection};
pub use scroll_state::{AutoscrollMode, OpacityMode, ScrollDirection, ScrollState, SuppressionWindows};
pub use session::{PlayerSession, SessionConfig};
pub use timings::SyncTimings;
pub use viewport::{LineBox, ScrollBehavior, ScrollContainer, TaggedContainer};

/// Primary input device. Touch-first (`Coarse`) platforms keep controls
/// visible and ignore direction-driven hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Fine,
    Coarse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollStrategy {
    /// Hand the container a smooth-scroll request.
    Native,
    /// Interpolate the position ourselves, one step per frame.
    Eased,
}

impl ScrollStrategy {
    pub fn for_pointer(pointer: PointerKind) -> Self {
        match pointer {
            PointerKind::Fine => ScrollStrategy::Native,
            PointerKind::Coarse => ScrollStrategy::Eased,
        }
    }
}

pub(crate) fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
