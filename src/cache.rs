//! Persistent location key cache
//!
//! Maps a raw location string, exactly as a caller typed it, to the weather
//! provider's location identifier. The whole mapping lives in one
//! pretty-printed JSON document. The cache is best effort: reads fail open and
//! write failures are reported to the caller instead of raised.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tokio::fs;

/// Entries with non-string values are kept on disk but never returned as hits
type Document = Map<String, Value>;

/// Outcome of a cache write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    Stored,
    /// The entry was not persisted; the reason is meant for a warning log
    Failed(String),
}

/// Cache file used when the platform reports no user cache directory
pub const FALLBACK_CACHE_PATH: &str = "weather/location_cache.json";

/// Default cache file location under the user's cache directory
#[must_use]
pub fn default_cache_path() -> PathBuf {
    cache_file_in(dirs::cache_dir())
}

fn cache_file_in(cache_dir: Option<PathBuf>) -> PathBuf {
    match cache_dir {
        Some(dir) => dir.join("weather").join("location_cache.json"),
        None => {
            tracing::warn!(
                "No user cache directory, using {} in the working directory",
                FALLBACK_CACHE_PATH
            );
            PathBuf::from(FALLBACK_CACHE_PATH)
        }
    }
}

/// JSON file backed location key cache
#[derive(Debug, Clone)]
pub struct LocationCache {
    path: PathBuf,
}

impl LocationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached identifier for `location`.
    /// Missing, unreadable or malformed cache files count as a miss, as does
    /// an entry whose value is not a string.
    #[tracing::instrument(name = "query_location_cache", level = "debug", skip(self))]
    pub async fn get(&self, location: &str) -> Option<String> {
        match self.read_document().await {
            Ok(mut document) => {
                let key = match document.remove(location) {
                    Some(Value::String(key)) => Some(key),
                    _ => None,
                };
                if key.is_some() {
                    tracing::debug!("Location key found");
                } else {
                    tracing::debug!("Location key not found");
                }
                key
            }
            Err(e) => {
                tracing::debug!("Location cache unavailable: {e:#}");
                None
            }
        }
    }

    /// Stores `identifier` for `location`, overwriting any previous entry.
    #[tracing::instrument(name = "put_location_cache", level = "debug", skip(self))]
    pub async fn put(&self, location: &str, identifier: &str) -> CacheWrite {
        match self.write_entry(location, identifier).await {
            Ok(()) => CacheWrite::Stored,
            Err(e) => CacheWrite::Failed(format!("{e:#}")),
        }
    }

    async fn write_entry(&self, location: &str, identifier: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
        }

        let mut document = self.read_document().await.unwrap_or_else(|e| {
            tracing::debug!("Starting from an empty location cache: {e:#}");
            Document::new()
        });
        document.insert(
            location.to_string(),
            Value::String(identifier.to_string()),
        );

        let contents = serde_json::to_string_pretty(&document)?;
        fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    async fn read_document(&self) -> Result<Document> {
        let contents = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let document = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed location cache {}", self.path.display()))?;
        Ok(document)
    }
}
