use super::cache::LocalTextCache;
use super::store::{PlainTextStore, StoreLookup, SyncedLyricsStore};
use super::{append_authorship, is_actually_synced, normalize_plain_text, LyricsLine, TrackKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything the resolver needs to know about the current track.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub key: TrackKey,
    /// Lines shipped inside the album manifest.
    pub embedded_synced: Option<Vec<LyricsLine>>,
    /// Text shipped inside the album manifest.
    pub embedded_text: Option<String>,
    /// Credit shipped inside the album manifest; wins over the store's.
    pub authorship: Option<String>,
    /// Seconds, `NaN` while unknown.
    pub duration: f64,
}

impl ResolveRequest {
    /// Whether synced lines are likely before any lookup finishes.
    pub fn has_synced_hint(&self) -> bool {
        self.embedded_synced
            .as_deref()
            .is_some_and(is_actually_synced)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLyrics {
    /// Karaoke lines, authorship line included. `None` when not synchronized.
    pub synced_lines: Option<Vec<LyricsLine>>,
    pub plain_text: Option<String>,
    pub authorship: Option<String>,
}

/// Three-tier lyrics lookup for one track.
pub struct LyricsResolver<S, P> {
    synced_store: Arc<S>,
    text_store: Arc<P>,
    local: LocalTextCache,
    embedded_fallback_on_absent: bool,
}

impl<S, P> LyricsResolver<S, P>
where
    S: SyncedLyricsStore,
    P: PlainTextStore,
{
    pub fn new(synced_store: Arc<S>, text_store: Arc<P>, local: LocalTextCache) -> Self {
        Self {
            synced_store,
            text_store,
            local,
            embedded_fallback_on_absent: false,
        }
    }

    /// Lets embedded lines through even when the store says it has none.
    pub fn with_embedded_fallback_on_absent(mut self, enabled: bool) -> Self {
        self.embedded_fallback_on_absent = enabled;
        self
    }

    pub fn synced_store(&self) -> &Arc<S> {
        &self.synced_store
    }

    pub fn text_store(&self) -> &Arc<P> {
        &self.text_store
    }

    pub fn local_cache(&self) -> &LocalTextCache {
        &self.local
    }

    pub async fn resolve(&self, req: &ResolveRequest) -> ResolvedLyrics {
        debug!(key = %req.key, "resolving lyrics");
        let ((synced_lines, authorship, unsynced), plain) =
            tokio::join!(self.resolve_synced(req), self.resolve_plain(req));

        // An all-zero line set is text in disguise
        let plain_text = plain.or_else(|| {
            unsynced.and_then(|lines| {
                let joined = lines
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                normalize_plain_text(&joined)
            })
        });

        info!(
            key = %req.key,
            synced = synced_lines.as_ref().map(|l| l.len()).unwrap_or(0),
            plain = plain_text.is_some(),
            "lyrics resolved"
        );
        ResolvedLyrics {
            synced_lines,
            plain_text,
            authorship,
        }
    }

    /// Returns `(karaoke lines, authorship, rejected unsynchronized lines)`.
    async fn resolve_synced(
        &self,
        req: &ResolveRequest,
    ) -> (Option<Vec<LyricsLine>>, Option<String>, Option<Vec<LyricsLine>>) {
        let (base, stored_authorship) = match self.synced_store.get_synced(&req.key).await {
            StoreLookup::Found(record) if !record.lines.is_empty() => {
                (Some(record.lines), record.authorship)
            }
            StoreLookup::Found(_) | StoreLookup::Absent => {
                if self.embedded_fallback_on_absent {
                    (req.embedded_synced.clone(), None)
                } else {
                    debug!(key = %req.key, "sync store has no lines, embedded lines ignored");
                    (None, None)
                }
            }
            StoreLookup::Unavailable => {
                warn!(key = %req.key, "sync store unavailable, using embedded lines");
                (req.embedded_synced.clone(), None)
            }
        };

        let Some(mut lines) = base.filter(|l| !l.is_empty()) else {
            return (None, None, None);
        };
        if !is_actually_synced(&lines) {
            return (None, None, Some(lines));
        }

        let authorship = req
            .authorship
            .clone()
            .filter(|a| !a.trim().is_empty())
            .or(stored_authorship.filter(|a| !a.trim().is_empty()));
        append_authorship(&mut lines, authorship.as_deref(), req.duration);
        (Some(lines), authorship, None)
    }

    async fn resolve_plain(&self, req: &ResolveRequest) -> Option<String> {
        if let Some(text) = req.embedded_text.as_deref().and_then(normalize_plain_text) {
            return Some(text);
        }

        let local = self.local.clone();
        let key = req.key.clone();
        let cached = tokio::task::spawn_blocking(move || local.load(&key))
            .await
            .ok()
            .flatten();
        if let Some(text) = cached.as_deref().and_then(normalize_plain_text) {
            return Some(text);
        }

        match self.text_store.get_text(&req.key).await {
            StoreLookup::Found(raw) => {
                let text = normalize_plain_text(&raw)?;
                let local = self.local.clone();
                let key = req.key.clone();
                let copy = text.clone();
                // Write-through in the background, a failure only costs a refetch
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = local.save(&key, &copy) {
                        debug!(key = %key, error = %e, "could not cache track text");
                    }
                });
                Some(text)
            }
            StoreLookup::Absent => None,
            StoreLookup::Unavailable => {
                warn!(key = %req.key, "text store unavailable");
                None
            }
        }
    }
}

/// The lyrics currently shown, tagged with the track they belong to.
///
/// `begin` wipes the previous track's content immediately; `complete` only
/// accepts a result whose key still matches.
#[derive(Debug, Default)]
pub struct LyricsSlot {
    key: Option<TrackKey>,
    loading: bool,
    has_synced_hint: bool,
    resolved: ResolvedLyrics,
}

impl LyricsSlot {
    pub fn begin(&mut self, key: TrackKey, has_synced_hint: bool) {
        self.key = Some(key);
        self.loading = true;
        self.has_synced_hint = has_synced_hint;
        self.resolved = ResolvedLyrics::default();
    }

    /// Returns `false` and drops `resolved` when it belongs to another track.
    pub fn complete(&mut self, key: &TrackKey, resolved: ResolvedLyrics) -> bool {
        if self.key.as_ref() != Some(key) {
            debug!(stale = %key, "discarding stale lyrics result");
            return false;
        }
        self.loading = false;
        self.has_synced_hint = resolved.synced_lines.is_some();
        self.resolved = resolved;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn key(&self) -> Option<&TrackKey> {
        self.key.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_synced_hint(&self) -> bool {
        self.has_synced_hint
    }

    pub fn synced_lines(&self) -> Option<&[LyricsLine]> {
        self.resolved.synced_lines.as_deref()
    }

    pub fn plain_text(&self) -> Option<&str> {
        self.resolved.plain_text.as_deref()
    }

    pub fn authorship(&self) -> Option<&str> {
        self.resolved.authorship.as_deref()
    }

    /// Anything to show at all; the lyrics toggle is disabled otherwise.
    pub fn has_content(&self) -> bool {
        self.resolved.synced_lines.is_some() || self.resolved.plain_text.is_some()
    }
}
