use crate::store::{set_to_sorted_vec, UserDataStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use cinewheel_models::RatingVector;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Anonymous backend: JSON files in the data directory. Corrupted files are
/// a miss (start empty with a warning), mirroring the metadata cache.
pub struct LocalUserStore {
    favorites_path: PathBuf,
    excluded_path: PathBuf,
    ratings_path: PathBuf,
}

impl LocalUserStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            favorites_path: data_dir.join("favorites.json"),
            excluded_path: data_dir.join("excluded.json"),
            ratings_path: data_dir.join("ratings.json"),
        }
    }

    fn load_file<T: DeserializeOwned + Default>(path: &Path) -> T {
        if !path.exists() {
            return T::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Corrupted store file {:?}: {}. Treating as empty.", path, e);
                    T::default()
                }
            },
            Err(e) => {
                warn!("Failed to read store file {:?}: {}", path, e);
                T::default()
            }
        }
    }

    fn save_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    fn load_ratings(&self) -> HashMap<String, RatingVector> {
        Self::load_file(&self.ratings_path)
    }
}

#[async_trait]
impl UserDataStore for LocalUserStore {
    async fn load_favorites(&self) -> Result<HashSet<u32>> {
        let ids: Vec<u32> = Self::load_file(&self.favorites_path);
        Ok(ids.into_iter().collect())
    }

    async fn save_favorites(&self, favorites: &HashSet<u32>) -> Result<()> {
        Self::save_file(&self.favorites_path, &set_to_sorted_vec(favorites))
    }

    async fn load_excluded(&self) -> Result<HashSet<u32>> {
        let ids: Vec<u32> = Self::load_file(&self.excluded_path);
        Ok(ids.into_iter().collect())
    }

    async fn save_excluded(&self, excluded: &HashSet<u32>) -> Result<()> {
        Self::save_file(&self.excluded_path, &set_to_sorted_vec(excluded))
    }

    async fn load_rating(&self, film_id: u32) -> Result<Option<RatingVector>> {
        Ok(self.load_ratings().get(&film_id.to_string()).copied())
    }

    async fn save_rating(&self, film_id: u32, rating: &RatingVector) -> Result<()> {
        let mut ratings = self.load_ratings();
        ratings.insert(film_id.to_string(), *rating);
        Self::save_file(&self.ratings_path, &ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{toggle_excluded, toggle_favorite};
    use tempfile::TempDir;

    #[tokio::test]
    async fn favorites_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalUserStore::new(dir.path());
        assert!(store.load_favorites().await.unwrap().is_empty());

        let favorites: HashSet<u32> = [3, 1, 2].into_iter().collect();
        store.save_favorites(&favorites).await.unwrap();
        assert_eq!(store.load_favorites().await.unwrap(), favorites);
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let dir = TempDir::new().unwrap();
        let store = LocalUserStore::new(dir.path());

        assert!(toggle_favorite(&store, 7).await.unwrap());
        assert!(store.load_favorites().await.unwrap().contains(&7));
        assert!(!toggle_favorite(&store, 7).await.unwrap());
        assert!(!store.load_favorites().await.unwrap().contains(&7));

        assert!(toggle_excluded(&store, 9).await.unwrap());
        assert!(!toggle_excluded(&store, 9).await.unwrap());
        assert!(store.load_excluded().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_vector_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalUserStore::new(dir.path());
        assert!(store.load_rating(1).await.unwrap().is_none());

        let rating = RatingVector {
            s1: 8,
            s2: 7,
            s3: 9,
            s4: 6,
            s5: 8,
            m: 9,
        };
        store.save_rating(1, &rating).await.unwrap();
        assert_eq!(store.load_rating(1).await.unwrap(), Some(rating));
        // Other film ids stay independent
        assert!(store.load_rating(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupted_store_file_is_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("favorites.json"), "[1, 2,").unwrap();
        let store = LocalUserStore::new(dir.path());
        assert!(store.load_favorites().await.unwrap().is_empty());
    }
}
