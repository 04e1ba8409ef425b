use anyhow::Result;
use chrono::Utc;
use cinewheel_models::{CacheEntry, MovieMetadata};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// File-backed cache for external lookups: one file for per-film metadata
/// keyed by "{title}_{year}", one for the genre id -> name map. Both run on
/// the 7-day TTL. Corrupted files are treated as empty, never as errors,
/// and writes are read-modify-write with last-writer-wins.
pub struct MetadataCache {
    metadata_path: PathBuf,
    genres_path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry<MovieMetadata>>>,
}

fn read_json_or_empty<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Corrupted cache file {:?}: {}. Treating as empty.", path, e);
                T::default()
            }
        },
        Err(e) => {
            warn!("Failed to read cache file {:?}: {}", path, e);
            T::default()
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) {
    let write = || -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(path, json)?;
        Ok(())
    };
    // Cache writes are best-effort: a failed write only costs a re-fetch
    if let Err(e) = write() {
        warn!("Failed to write cache file {:?}: {}", path, e);
    }
}

impl MetadataCache {
    pub fn open(metadata_path: PathBuf, genres_path: PathBuf) -> Self {
        let entries: HashMap<String, CacheEntry<MovieMetadata>> =
            read_json_or_empty(&metadata_path);
        debug!(
            "Opened metadata cache: {} entries from {:?}",
            entries.len(),
            metadata_path
        );
        Self {
            metadata_path,
            genres_path,
            entries: Mutex::new(entries),
        }
    }

    /// Fresh entry for the key, or None if absent/expired.
    pub fn lookup(&self, key: &str) -> Option<MovieMetadata> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;
        if entry.is_fresh(Utc::now()) {
            debug!("Metadata cache hit: {}", key);
            Some(entry.data.clone())
        } else {
            debug!("Metadata cache expired: {}", key);
            None
        }
    }

    /// Store the raw lookup result under the key with the current
    /// timestamp, superseding any previous entry.
    pub fn store(&self, key: &str, metadata: &MovieMetadata) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), CacheEntry::new(metadata.clone()));
        write_json(&self.metadata_path, &*entries);
    }

    pub fn load_genres(&self) -> Option<HashMap<u32, String>> {
        let entry: Option<CacheEntry<HashMap<u32, String>>> =
            read_json_or_empty(&self.genres_path);
        let entry = entry?;
        if entry.is_fresh(Utc::now()) {
            Some(entry.data)
        } else {
            None
        }
    }

    pub fn save_genres(&self, genres: &HashMap<u32, String>) {
        write_json(&self.genres_path, &CacheEntry::new(genres.clone()));
    }

    #[cfg(test)]
    pub(crate) fn insert_with_timestamp(
        &self,
        key: &str,
        metadata: MovieMetadata,
        timestamp: chrono::DateTime<Utc>,
    ) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            CacheEntry {
                data: metadata,
                timestamp,
            },
        );
    }
}
