use crate::lyrics::lrc::parse_lrc;
use crate::lyrics::{LyricsLine, ResolveRequest, TrackKey};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

// Tracks without a known length play until shortly after their last line.
const TAIL_AFTER_LAST_LINE_SECS: f64 = 10.0;
const FALLBACK_DURATION_SECS: f64 = 180.0;

/// One entry of an album manifest 🎵
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub authorship: Option<String>,
    #[serde(default)]
    pub synced_lyrics: Option<Vec<LyricsLine>>,
    /// Inline LRC, used when `syncedLyrics` is missing.
    #[serde(default)]
    pub lrc: Option<String>,
}

impl Track {
    pub fn embedded_lines(&self) -> Option<Vec<LyricsLine>> {
        if let Some(lines) = &self.synced_lyrics {
            return Some(lines.clone());
        }
        self.lrc
            .as_deref()
            .map(parse_lrc)
            .filter(|lines| !lines.is_empty())
    }

    /// Length to give the clock when the manifest does not say.
    pub fn duration_hint(&self) -> f64 {
        if let Some(d) = self.duration.filter(|d| d.is_finite() && *d > 0.0) {
            return d;
        }
        self.embedded_lines()
            .and_then(|lines| lines.last().map(|l| l.start_time + TAIL_AFTER_LAST_LINE_SECS))
            .filter(|d| *d > TAIL_AFTER_LAST_LINE_SECS)
            .unwrap_or(FALLBACK_DURATION_SECS)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Album {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let album: Album = serde_json::from_str(content)?;
        if album.tracks.is_empty() {
            anyhow::bail!("album '{}' has no tracks", album.id);
        }
        Ok(album)
    }

    pub fn track_index(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn resolve_request(&self, index: usize, lang: &str) -> Option<ResolveRequest> {
        let track = self.tracks.get(index)?;
        Some(ResolveRequest {
            key: TrackKey::new(&self.id, &track.id, lang),
            embedded_synced: track.embedded_lines(),
            embedded_text: track.content.clone(),
            authorship: track.authorship.clone(),
            duration: track.duration_hint(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "id": "night-album",
        "title": "Night",
        "artist": "Someone",
        "tracks": [
            { "id": "1", "title": "Intro", "duration": 95.5,
              "syncedLyrics": [{ "text": "hello", "startTime": 1.5 }] },
            { "id": "2", "title": "Inline", "lrc": "[00:02.00]first\n[00:20.50]second" },
            { "id": "3", "title": "Words", "content": "just text" }
        ]
    }"#;

    #[test]
    fn test_manifest_parses_and_inline_lrc_is_used() {
        let album = Album::from_json(MANIFEST).unwrap();
        assert_eq!(album.tracks.len(), 3);
        assert_eq!(album.track_index("2"), Some(1));

        let inline = album.tracks[1].embedded_lines().unwrap();
        assert_eq!(inline.len(), 2);
        assert_eq!(inline[1].start_time, 20.5);
        assert_eq!(album.tracks[1].duration_hint(), 30.5);
        assert_eq!(album.tracks[2].duration_hint(), 180.0);
    }

    #[test]
    fn test_resolve_request_carries_track_data() {
        let album = Album::from_json(MANIFEST).unwrap();
        let req = album.resolve_request(0, "en").unwrap();
        assert_eq!(req.key.to_string(), "night-album::1::en");
        assert_eq!(req.duration, 95.5);
        assert!(req.has_synced_hint());
        assert!(album.resolve_request(9, "en").is_none());
    }

    #[test]
    fn test_empty_album_is_rejected() {
        assert!(Album::from_json(r#"{"id":"x","title":"y","tracks":[]}"#).is_err());
    }
}
