use serde::{Deserialize, Serialize};
use std::fmt;

pub mod cache;
pub mod locator;
pub mod lrc;
pub mod remote;
pub mod resolver;
pub mod store;

pub use locator::{active_line_index, gap_at, Gap};
pub use resolver::{LyricsResolver, LyricsSlot, ResolveRequest, ResolvedLyrics};
pub use store::{PlainTextStore, StoreLookup, SyncedLyricsStore, SyncedRecord};

/// One karaoke line. Times are in seconds from track start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsLine {
    pub text: String,
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl LyricsLine {
    pub fn new(text: impl Into<String>, start_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time: None,
        }
    }

    pub fn with_end(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// `(albumId, trackId, lang)` identity of a track's lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackKey {
    pub album_id: String,
    pub track_id: String,
    pub lang: String,
}

impl TrackKey {
    pub fn new(album_id: &str, track_id: &str, lang: &str) -> Self {
        Self {
            album_id: album_id.to_string(),
            track_id: track_id.to_string(),
            lang: lang.to_string(),
        }
    }
}

/// Renders as `albumId::trackId::lang`, the tag every resolution run carries.
impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.album_id, self.track_id, self.lang)
    }
}

/// A line set is karaoke only if at least one line starts after zero.
pub fn is_actually_synced(lines: &[LyricsLine]) -> bool {
    lines.iter().any(|l| l.start_time > 0.0)
}

/// `\r\n` to `\n`, trimmed. Blank input yields `None`.
pub fn normalize_plain_text(text: &str) -> Option<String> {
    let normalized = text.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Appends the authorship credit as a trailing line anchored at `duration`
/// (0 when the duration is not known yet). Skipped when the last line already
/// carries the same text.
pub fn append_authorship(lines: &mut Vec<LyricsLine>, authorship: Option<&str>, duration: f64) {
    let Some(credit) = authorship.filter(|a| !a.trim().is_empty()) else {
        return;
    };
    if lines.last().is_some_and(|last| last.text == credit) {
        return;
    }
    let anchor = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    };
    lines.push(LyricsLine::new(credit, anchor));
}
