//! Cache manager for persisting the last shown article to disk
//!
//! Stores the article as JSON, the image as raw bytes, and the write time as
//! epoch milliseconds in three separate files. The three writes are not
//! atomic as a group: a crash between them can leave an article paired with
//! an older image or timestamp. Nothing attempts to repair that state; the
//! next successful save overwrites all three files.

use chrono::Utc;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::news::{Article, ArticleImage};

/// How long a cached article is considered fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

const ARTICLE_FILE: &str = "article.json";
const IMAGE_FILE: &str = "article_image.jpg";
const TIMESTAMP_FILE: &str = "cache_timestamp.txt";

/// Errors raised while writing the cache
///
/// These never leave the cache manager's public API; `save` logs and drops them.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Directory creation or file write failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Article could not be serialized
    #[error("Failed to serialize article: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot of what the cache currently holds on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheMetadata {
    /// Epoch milliseconds of the last completed save, if recorded and readable
    pub last_write_ms: Option<i64>,
    /// Location of the cached image bytes
    pub image_path: PathBuf,
    /// Location of the cached article record
    pub article_path: PathBuf,
}

/// Manages reading and writing the cached article to disk
///
/// Files live in an XDG-compliant cache directory (`~/.cache/sportnews/` on
/// Linux). There is no locking: two processes saving at once can interleave
/// their writes.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// Freshness window
    ttl: Duration,
}

impl CacheManager {
    /// Creates a new CacheManager using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "sportnews")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            ttl: DEFAULT_TTL,
        }
    }

    /// Overrides the freshness window
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn article_path(&self) -> PathBuf {
        self.cache_dir.join(ARTICLE_FILE)
    }

    fn image_path(&self) -> PathBuf {
        self.cache_dir.join(IMAGE_FILE)
    }

    fn timestamp_path(&self) -> PathBuf {
        self.cache_dir.join(TIMESTAMP_FILE)
    }

    /// Reads the recorded write time, if present and parseable
    fn read_timestamp(&self) -> Option<i64> {
        let content = fs::read_to_string(self.timestamp_path()).ok()?;
        content.trim().parse().ok()
    }

    /// Returns a snapshot of the cache's on-disk state
    pub fn metadata(&self) -> CacheMetadata {
        CacheMetadata {
            last_write_ms: self.read_timestamp(),
            image_path: self.image_path(),
            article_path: self.article_path(),
        }
    }

    /// Returns true if the cache should not be used
    ///
    /// Any failure to read or parse the timestamp counts as expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    /// Expiry check against an explicit clock reading in epoch milliseconds
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        let Some(written_ms) = self.read_timestamp() else {
            return true;
        };
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(written_ms) > ttl_ms
    }

    /// Writes the article, the optional image bytes, then the current time
    ///
    /// Failures are logged and otherwise ignored; the cache may simply stay stale.
    pub fn save(&self, article: &Article, image: Option<&[u8]>) {
        if let Err(err) = self.try_save(article, image) {
            warn!(%err, dir = %self.cache_dir.display(), "failed to write article cache");
        }
    }

    /// Fallible form of [`CacheManager::save`]
    ///
    /// # Returns
    /// * `Ok(())` once all files are written
    /// * `Err(CacheError)` on the first failed write; earlier writes are not rolled back
    pub fn try_save(&self, article: &Article, image: Option<&[u8]>) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        let json = serde_json::to_string_pretty(article)?;
        fs::write(self.article_path(), json)?;

        if let Some(bytes) = image {
            fs::write(self.image_path(), bytes)?;
        }

        fs::write(
            self.timestamp_path(),
            Utc::now().timestamp_millis().to_string(),
        )?;
        Ok(())
    }

    /// Reads the cached article and image
    ///
    /// Returns `None` unless both files exist, the article parses, and the
    /// image decodes.
    pub fn load(&self) -> Option<(Article, ArticleImage)> {
        let content = match fs::read_to_string(self.article_path()) {
            Ok(content) => content,
            Err(err) => {
                debug!(%err, "no cached article");
                return None;
            }
        };
        let bytes = match fs::read(self.image_path()) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(%err, "no cached image");
                return None;
            }
        };

        let article: Article = match serde_json::from_str(&content) {
            Ok(article) => article,
            Err(err) => {
                debug!(%err, "cached article is corrupt");
                return None;
            }
        };
        let image = match ArticleImage::decode(bytes) {
            Ok(image) => image,
            Err(err) => {
                debug!(%err, "cached image is corrupt");
                return None;
            }
        };

        Some((article, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::image::sample_png;
    use crate::news::Source;
    use std::thread;
    use tempfile::TempDir;

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn test_article() -> Article {
        Article {
            title: "Late winner".to_string(),
            author: Some("A. Writer".to_string()),
            content: Some("A dramatic finish...".to_string()),
            image_url: Some("http://x/1.jpg".to_string()),
            published_at: "2024-05-04T18:00:00Z".to_string(),
            source: Source {
                id: None,
                name: "Sports Daily".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_fresh_store_is_expired() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.is_expired(), "Empty cache should be expired");
        assert!(cache.metadata().last_write_ms.is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let (cache, _temp_dir) = create_test_cache();
        let article = test_article();
        let png = sample_png(2, 2);

        cache.save(&article, Some(&png));

        let (loaded, image) = cache.load().expect("Should load saved article");
        assert_eq!(loaded, article);
        assert_eq!(image.bytes(), png.as_slice());
    }

    #[test]
    fn test_save_writes_three_files() {
        let (cache, temp_dir) = create_test_cache();
        cache.save(&test_article(), Some(&sample_png(1, 1)));

        assert!(temp_dir.path().join("article.json").exists());
        assert!(temp_dir.path().join("article_image.jpg").exists());
        let ts = fs::read_to_string(temp_dir.path().join("cache_timestamp.txt"))
            .expect("Should read timestamp");
        assert!(ts.parse::<i64>().is_ok(), "Timestamp should be epoch millis");
    }

    #[test]
    fn test_not_expired_immediately_after_save() {
        let (cache, _temp_dir) = create_test_cache();
        cache.save(&test_article(), Some(&sample_png(1, 1)));
        assert!(!cache.is_expired(), "Cache should be fresh right after save");
    }

    #[test]
    fn test_expired_once_ttl_elapses() {
        let (cache, _temp_dir) = create_test_cache();
        cache.save(&test_article(), Some(&sample_png(1, 1)));

        let written = cache.metadata().last_write_ms.expect("Timestamp recorded");
        assert!(!cache.is_expired_at(written + 10_000));
        assert!(cache.is_expired_at(written + 10_001));
    }

    #[test]
    fn test_short_ttl_expires_after_sleep() {
        let (cache, _temp_dir) = create_test_cache();
        let cache = cache.with_ttl(Duration::from_millis(20));
        cache.save(&test_article(), Some(&sample_png(1, 1)));

        thread::sleep(Duration::from_millis(60));

        assert!(cache.is_expired());
    }

    #[test]
    fn test_unparseable_timestamp_is_expired() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("cache_timestamp.txt"), "yesterday").unwrap();
        assert!(cache.is_expired());
    }

    #[test]
    fn test_timestamp_with_trailing_newline_is_accepted() {
        let (cache, temp_dir) = create_test_cache();
        let now = Utc::now().timestamp_millis();
        fs::write(
            temp_dir.path().join("cache_timestamp.txt"),
            format!("{}\n", now),
        )
        .unwrap();
        assert!(!cache.is_expired_at(now + 1));
    }

    #[test]
    fn test_load_returns_none_without_image() {
        let (cache, _temp_dir) = create_test_cache();
        cache.save(&test_article(), None);

        assert!(cache.load().is_none(), "Article alone is not a cache hit");
        assert!(!cache.is_expired(), "Timestamp is still written");
    }

    #[test]
    fn test_load_returns_none_for_corrupt_article() {
        let (cache, temp_dir) = create_test_cache();
        cache.save(&test_article(), Some(&sample_png(1, 1)));
        fs::write(temp_dir.path().join("article.json"), "{ not json").unwrap();

        assert!(cache.load().is_none());
    }

    #[test]
    fn test_load_returns_none_for_corrupt_image() {
        let (cache, _temp_dir) = create_test_cache();
        cache.save(&test_article(), Some(b"garbage"));

        assert!(cache.load().is_none());
    }

    #[test]
    fn test_save_without_image_keeps_previous_image() {
        let (cache, _temp_dir) = create_test_cache();
        let png = sample_png(2, 2);
        cache.save(&test_article(), Some(&png));

        let mut newer = test_article();
        newer.title = "Newer".to_string();
        cache.save(&newer, None);

        let (loaded, image) = cache.load().expect("Should load");
        assert_eq!(loaded.title, "Newer");
        assert_eq!(image.bytes(), png.as_slice());
    }

    #[test]
    fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let cache = CacheManager::with_dir(nested_path.clone());

        cache.save(&test_article(), Some(&sample_png(1, 1)));

        assert!(nested_path.join("article.json").exists());
    }

    #[test]
    fn test_save_error_is_swallowed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let cache = CacheManager::with_dir(blocker.join("cache"));

        assert!(cache.try_save(&test_article(), None).is_err());
        cache.save(&test_article(), None);
        assert!(cache.is_expired());
    }

    #[test]
    fn test_metadata_paths() {
        let (cache, temp_dir) = create_test_cache();
        let meta = cache.metadata();
        assert_eq!(meta.article_path, temp_dir.path().join("article.json"));
        assert_eq!(meta.image_path, temp_dir.path().join("article_image.jpg"));
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(cache) = CacheManager::new() {
            let path_str = cache.cache_dir().to_string_lossy();
            assert!(path_str.contains("sportnews"));
            assert_eq!(cache.ttl(), DEFAULT_TTL);
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
