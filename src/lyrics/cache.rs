use super::TrackKey;
use crate::error::LyricsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedText {
    album_id: String,
    track_id: String,
    lang: String,
    content: String,
}

/// Plain lyric text cached on disk, one file per `(album, track, lang)`.
#[derive(Debug, Clone)]
pub struct LocalTextCache {
    root: PathBuf,
}

impl LocalTextCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$XDG_CACHE_HOME/lyricsync/text`, falling back to `~/.cache`.
    pub fn default_location() -> Self {
        let cache_root = dirs::cache_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".cache")
        });
        Self::new(cache_root.join("lyricsync").join("text"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &TrackKey) -> PathBuf {
        let filename = format!(
            "{}_{}_{}.json",
            safe_component(&key.album_id),
            safe_component(&key.track_id),
            safe_component(&key.lang)
        );
        self.root.join(filename)
    }

    pub fn load(&self, key: &TrackKey) -> Option<String> {
        let file = fs::File::open(self.path_for(key)).ok()?;
        let cached: CachedText = serde_json::from_reader(file).ok()?;
        let same_track = cached.album_id == key.album_id
            && cached.track_id == key.track_id
            && cached.lang == key.lang;
        same_track.then_some(cached.content)
    }

    pub fn save(&self, key: &TrackKey, content: &str) -> Result<(), LyricsError> {
        fs::create_dir_all(&self.root)?;
        let entry = CachedText {
            album_id: key.album_id.clone(),
            track_id: key.track_id.clone(),
            lang: key.lang.clone(),
            content: content.to_string(),
        };
        let file = fs::File::create(self.path_for(key))?;
        serde_json::to_writer(file, &entry)?;
        Ok(())
    }
}

// Ids with slashes or dots must not escape the cache directory. Two keys
// that sanitize alike share a file; `load` checks the stored ids.
fn safe_component(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache(name: &str) -> LocalTextCache {
        let dir = std::env::temp_dir().join(format!("lyricsync-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        LocalTextCache::new(dir)
    }

    #[test]
    fn test_save_then_load() {
        let cache = temp_cache("roundtrip");
        let key = TrackKey::new("a/b", "../7", "en");
        assert_eq!(cache.load(&key), None);

        cache.save(&key, "verse\nchorus").unwrap();
        assert_eq!(cache.load(&key).as_deref(), Some("verse\nchorus"));

        // Other language is a different entry
        assert_eq!(cache.load(&TrackKey::new("a/b", "../7", "ru")), None);
        let _ = fs::remove_dir_all(cache.root());
    }

    #[test]
    fn test_file_name_is_readable_and_stable() {
        let cache = LocalTextCache::new("/tmp/lyricsync-names");
        let key = TrackKey::new("a/b", "../7", "en");
        let path = cache.path_for(&key);
        assert_eq!(path, Path::new("/tmp/lyricsync-names").join("a_b____7_en.json"));
        // Same name from a fresh handle, so entries survive restarts
        let again = LocalTextCache::new("/tmp/lyricsync-names");
        assert_eq!(again.path_for(&TrackKey::new("a/b", "../7", "en")), path);
    }

    #[test]
    fn test_sanitized_collision_is_a_miss() {
        let cache = temp_cache("collision");
        let first = TrackKey::new("a_b", "1", "en");
        let second = TrackKey::new("a/b", "1", "en");
        assert_eq!(cache.path_for(&first), cache.path_for(&second));

        cache.save(&first, "words").unwrap();
        assert_eq!(cache.load(&second), None);
        let _ = fs::remove_dir_all(cache.root());
    }
}
