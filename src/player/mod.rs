pub mod clock;
pub mod playlist;
pub mod time_display;
pub mod traits;

pub use clock::ClockMedia;
pub use playlist::Playlist;
pub use time_display::{format_remaining, format_time, TimeDisplay};
pub use traits::{MediaElement, MediaEvent, PlayerState, RepeatMode};
