use super::store::{PlainTextStore, StoreLookup, SyncedLyricsStore, SyncedRecord};
use super::{LyricsLine, TrackKey};
use crate::error::LyricsError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const SYNCED_PATH: &str = "/api/synced-lyrics";
const SAVE_TEXT_PATH: &str = "/api/save-track-text";

/// Knobs for the HTTP store, normally taken from `config.toml`.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    pub cache_ttl: Duration,
    pub request_gap: Duration,
    pub timeout: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            cache_ttl: Duration::from_secs(300),
            request_gap: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackPayload {
    synced_lyrics: Option<Vec<LyricsLine>>,
    authorship: Option<String>,
    content: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveSynced<'a> {
    album_id: &'a str,
    track_id: &'a str,
    lang: &'a str,
    synced_lyrics: &'a [LyricsLine],
    #[serde(skip_serializing_if = "Option::is_none")]
    authorship: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveText<'a> {
    album_id: &'a str,
    track_id: &'a str,
    lang: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorship: Option<&'a str>,
}

struct CachedLookup {
    fetched_at: Instant,
    /// `None` caches an authoritative miss.
    payload: Option<TrackPayload>,
}

/// Both lyric stores backed by the site's HTTP API.
///
/// Answers (hits and authoritative misses) are cached per track for the TTL.
/// Requests go out one at a time with a minimum gap between them so a burst
/// of track changes does not hammer the backend.
pub struct HttpLyricsStore {
    client: Client,
    settings: RemoteSettings,
    cache: Mutex<HashMap<String, CachedLookup>>,
    // Completion time of the previous request; the lock is the queue
    last_request: tokio::sync::Mutex<Option<Instant>>,
}

fn cache_key(key: &TrackKey) -> String {
    format!("{}-{}-{}", key.album_id, key.track_id, key.lang)
}

impl HttpLyricsStore {
    pub fn new(client: Client, settings: RemoteSettings) -> Self {
        Self {
            client,
            settings,
            cache: Mutex::new(HashMap::new()),
            last_request: tokio::sync::Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn cached(&self, key: &str) -> Option<Option<TrackPayload>> {
        let mut cache = self.cache.lock().ok()?;
        match cache.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.settings.cache_ttl => {
                Some(entry.payload.clone())
            }
            Some(_) => {
                cache.remove(key);
                None
            }
            None => None,
        }
    }

    fn remember(&self, key: String, payload: Option<TrackPayload>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                key,
                CachedLookup {
                    fetched_at: Instant::now(),
                    payload,
                },
            );
        }
    }

    fn invalidate(&self, key: &TrackKey) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(&cache_key(key));
        }
    }

    /// Sleeps out whatever is left of the gap after the previous request.
    async fn wait_gap(&self, last: Option<Instant>) {
        if let Some(at) = last {
            let wait = self.settings.request_gap.saturating_sub(at.elapsed());
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Waits for the queue, then keeps it for the duration of one request.
    async fn queued<F, T>(&self, request: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let mut last = self.last_request.lock().await;
        self.wait_gap(*last).await;
        let out = request.await;
        *last = Some(Instant::now());
        out
    }

    fn from_cache(&self, key: &TrackKey, ck: &str) -> Option<StoreLookup<TrackPayload>> {
        let hit = self.cached(ck)?;
        debug!(key = %key, "lyrics store cache hit");
        Some(match hit {
            Some(payload) => StoreLookup::Found(payload),
            None => StoreLookup::Absent,
        })
    }

    /// One lookup per track at a time: synced and text lookups for the same
    /// track share the answer of whichever reached the queue first.
    async fn lookup(&self, key: &TrackKey) -> StoreLookup<TrackPayload> {
        let ck = cache_key(key);
        if let Some(hit) = self.from_cache(key, &ck) {
            return hit;
        }

        let mut last = self.last_request.lock().await;
        // Filled while we waited in the queue
        if let Some(hit) = self.from_cache(key, &ck) {
            return hit;
        }
        self.wait_gap(*last).await;
        let out = self.fetch(key, ck).await;
        *last = Some(Instant::now());
        out
    }

    async fn fetch(&self, key: &TrackKey, ck: String) -> StoreLookup<TrackPayload> {
        let sent = self
            .client
            .get(self.url(SYNCED_PATH))
            .query(&[
                ("albumId", key.album_id.as_str()),
                ("trackId", key.track_id.as_str()),
                ("lang", key.lang.as_str()),
            ])
            .timeout(self.settings.timeout)
            .send()
            .await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    warn!(key = %key, "lyrics store timed out");
                } else {
                    warn!(key = %key, error = %e, "lyrics store unreachable");
                }
                return StoreLookup::Unavailable;
            }
        };

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            self.remember(ck, None);
            return StoreLookup::Absent;
        }
        if !status.is_success() {
            warn!(key = %key, status = status.as_u16(), "lyrics store error status");
            return StoreLookup::Unavailable;
        }
        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            warn!(key = %key, "lyrics store answered with a non-JSON body");
            return StoreLookup::Unavailable;
        }

        match resp.json::<ApiResponse<TrackPayload>>().await {
            Ok(body) => {
                let data = if body.success { body.data } else { None };
                self.remember(ck, data.clone());
                match data {
                    Some(payload) => StoreLookup::Found(payload),
                    None => StoreLookup::Absent,
                }
            }
            Err(e) => {
                warn!(key = %key, error = %e, "lyrics store body did not decode");
                StoreLookup::Unavailable
            }
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), LyricsError> {
        let request = self
            .client
            .post(self.url(path))
            .json(body)
            .timeout(self.settings.timeout)
            .send();
        let resp = self.queued(request).await.map_err(|e| {
            if e.is_timeout() {
                LyricsError::Timeout(self.settings.timeout.as_millis() as u64)
            } else {
                LyricsError::Http(e)
            }
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LyricsError::Status(status.as_u16()));
        }
        let text = resp.text().await?;
        let body: ApiResponse<serde_json::Value> = serde_json::from_str(&text)?;
        if !body.success {
            return Err(LyricsError::Rejected(
                body.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(())
    }
}

fn synced_from(payload: TrackPayload) -> StoreLookup<SyncedRecord> {
    match payload.synced_lyrics {
        Some(lines) if !lines.is_empty() => StoreLookup::Found(SyncedRecord {
            lines,
            authorship: payload.authorship,
        }),
        _ => StoreLookup::Absent,
    }
}

/// Plain text rides on the same endpoint: stored lines are joined back into
/// text whether or not they carry timings, else the raw `content` is used.
fn text_from(payload: TrackPayload) -> StoreLookup<String> {
    if let Some(lines) = payload.synced_lyrics.filter(|l| !l.is_empty()) {
        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        return StoreLookup::Found(text);
    }
    match payload.content {
        Some(content) => StoreLookup::Found(content),
        None => StoreLookup::Absent,
    }
}

impl SyncedLyricsStore for HttpLyricsStore {
    async fn get_synced(&self, key: &TrackKey) -> StoreLookup<SyncedRecord> {
        match self.lookup(key).await {
            StoreLookup::Found(payload) => synced_from(payload),
            StoreLookup::Absent => StoreLookup::Absent,
            StoreLookup::Unavailable => StoreLookup::Unavailable,
        }
    }

    async fn put_synced(
        &self,
        key: &TrackKey,
        lines: &[LyricsLine],
        authorship: Option<&str>,
    ) -> Result<(), LyricsError> {
        let body = SaveSynced {
            album_id: &key.album_id,
            track_id: &key.track_id,
            lang: &key.lang,
            synced_lyrics: lines,
            authorship,
        };
        self.post(SYNCED_PATH, &body).await?;
        self.invalidate(key);
        info!(key = %key, lines = lines.len(), "saved synced lyrics");
        Ok(())
    }
}

impl PlainTextStore for HttpLyricsStore {
    async fn get_text(&self, key: &TrackKey) -> StoreLookup<String> {
        match self.lookup(key).await {
            StoreLookup::Found(payload) => text_from(payload),
            StoreLookup::Absent => StoreLookup::Absent,
            StoreLookup::Unavailable => StoreLookup::Unavailable,
        }
    }

    async fn put_text(
        &self,
        key: &TrackKey,
        content: &str,
        authorship: Option<&str>,
    ) -> Result<(), LyricsError> {
        let body = SaveText {
            album_id: &key.album_id,
            track_id: &key.track_id,
            lang: &key.lang,
            content,
            authorship,
        };
        self.post(SAVE_TEXT_PATH, &body).await?;
        self.invalidate(key);
        info!(key = %key, "saved track text");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves the canned `(status line, content type, body)` answers in order,
    /// one per connection, and returns the base URL.
    async fn serve(answers: Vec<(&'static str, &'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for (status, content_type, body) in answers {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let reply = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn store(base_url: String) -> HttpLyricsStore {
        HttpLyricsStore::new(
            Client::new(),
            RemoteSettings {
                base_url,
                request_gap: Duration::from_millis(0),
                ..RemoteSettings::default()
            },
        )
    }

    fn key() -> TrackKey {
        TrackKey::new("album", "1", "en")
    }

    #[test]
    fn test_text_from_lines_or_content() {
        let payload = TrackPayload {
            synced_lyrics: Some(vec![LyricsLine::new("a", 0.0), LyricsLine::new("b", 0.0)]),
            ..TrackPayload::default()
        };
        assert_eq!(text_from(payload), StoreLookup::Found("a\nb".to_string()));

        let payload = TrackPayload {
            content: Some("raw".to_string()),
            ..TrackPayload::default()
        };
        assert_eq!(text_from(payload), StoreLookup::Found("raw".to_string()));
        assert_eq!(text_from(TrackPayload::default()), StoreLookup::Absent);
    }

    #[test]
    fn test_empty_synced_payload_is_absent() {
        let payload = TrackPayload {
            synced_lyrics: Some(Vec::new()),
            ..TrackPayload::default()
        };
        assert_eq!(synced_from(payload), StoreLookup::Absent);
    }

    #[tokio::test]
    async fn test_found_is_cached() {
        let body = r#"{"success":true,"data":{"syncedLyrics":[{"text":"hi","startTime":1.0}],"authorship":"me"}}"#;
        // Only one answer: the second lookup must come from the cache
        let store = store(serve(vec![("200 OK", "application/json", body)]).await);

        let first = store.get_synced(&key()).await;
        let record = first.found().unwrap();
        assert_eq!(record.lines.len(), 1);
        assert_eq!(record.authorship.as_deref(), Some("me"));

        let again = store.get_synced(&key()).await;
        assert!(matches!(again, StoreLookup::Found(_)));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_request() {
        let body = r#"{"success":true,"data":{"syncedLyrics":[{"text":"hi","startTime":1.0},{"text":"there","startTime":2.0}]}}"#;
        // A second request would find the listener gone
        let base = serve(vec![("200 OK", "application/json", body)]).await;
        let store = HttpLyricsStore::new(
            Client::new(),
            RemoteSettings {
                base_url: base,
                ..RemoteSettings::default()
            },
        );

        let started = Instant::now();
        let k = key();
        let (synced, text) = tokio::join!(store.get_synced(&k), store.get_text(&k));
        assert_eq!(synced.found().unwrap().lines.len(), 2);
        assert_eq!(text, StoreLookup::Found("hi\nthere".to_string()));
        // Neither lookup sat out the request gap
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_not_found_and_errors() {
        let base = serve(vec![
            ("404 Not Found", "application/json", "{}"),
            ("500 Internal Server Error", "application/json", "{}"),
            ("200 OK", "text/html", "<html></html>"),
        ])
        .await;
        let store = store(base);

        assert_eq!(store.get_synced(&key()).await, StoreLookup::Absent);
        // Different tracks so the cached miss does not answer
        let k2 = TrackKey::new("album", "2", "en");
        assert_eq!(store.get_synced(&k2).await, StoreLookup::Unavailable);
        let k3 = TrackKey::new("album", "3", "en");
        assert_eq!(store.get_text(&k3).await, StoreLookup::Unavailable);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unavailable() {
        // Bind then drop so the port refuses connections
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let store = store(format!("http://{}", addr));
        assert_eq!(store.get_synced(&key()).await, StoreLookup::Unavailable);
    }

    #[tokio::test]
    async fn test_put_invalidates_cache() {
        let base = serve(vec![
            ("404 Not Found", "application/json", "{}"),
            ("200 OK", "application/json", r#"{"success":true}"#),
            (
                "200 OK",
                "application/json",
                r#"{"success":true,"data":{"syncedLyrics":[{"text":"new","startTime":2.0}]}}"#,
            ),
        ])
        .await;
        let store = store(base);

        assert_eq!(store.get_synced(&key()).await, StoreLookup::Absent);
        store
            .put_synced(&key(), &[LyricsLine::new("new", 2.0)], None)
            .await
            .unwrap();
        let after = store.get_synced(&key()).await.found().unwrap();
        assert_eq!(after.lines[0].text, "new");
    }

    #[tokio::test]
    async fn test_rejected_put() {
        let base = serve(vec![(
            "200 OK",
            "application/json",
            r#"{"success":false,"message":"not allowed"}"#,
        )])
        .await;
        let err = store(base).put_text(&key(), "text", None).await.unwrap_err();
        assert!(matches!(err, LyricsError::Rejected(ref m) if m == "not allowed"));
    }
}
