use super::{LyricsLine, TrackKey};
use crate::error::LyricsError;
use std::future::Future;

/// Outcome of a store lookup.
///
/// `Absent` is the store's authoritative "nothing here"; `Unavailable` means the
/// store could not answer (network, timeout, bad body) and the caller should
/// treat the answer as unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLookup<T> {
    Found(T),
    Absent,
    Unavailable,
}

impl<T> StoreLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            StoreLookup::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// What the per-user sync store keeps for a track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncedRecord {
    pub lines: Vec<LyricsLine>,
    pub authorship: Option<String>,
}

/// Remote per-user store of synchronized lines.
pub trait SyncedLyricsStore: Send + Sync {
    fn get_synced(&self, key: &TrackKey)
        -> impl Future<Output = StoreLookup<SyncedRecord>> + Send;

    fn put_synced(
        &self,
        key: &TrackKey,
        lines: &[LyricsLine],
        authorship: Option<&str>,
    ) -> impl Future<Output = Result<(), LyricsError>> + Send;
}

/// Remote database of plain lyric text.
pub trait PlainTextStore: Send + Sync {
    fn get_text(&self, key: &TrackKey) -> impl Future<Output = StoreLookup<String>> + Send;

    fn put_text(
        &self,
        key: &TrackKey,
        content: &str,
        authorship: Option<&str>,
    ) -> impl Future<Output = Result<(), LyricsError>> + Send;
}
