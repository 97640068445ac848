use crate::lyrics::{ResolvedLyrics, TrackKey};
use crate::ui::theme::Theme;
use crossterm::event::Event;

pub enum AppEvent {
    Input(Event),
    /// A resolution run finished; the key says which track it was for.
    LyricsResolved(TrackKey, ResolvedLyrics),
    ThemeUpdate(Theme),
    Tick,
}
