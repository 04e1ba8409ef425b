use crate::filter::{apply_filters, sort_films};
use crate::rating::composite_score;
use crate::store::{self, UserDataStore};
use crate::store_router::StoreRouter;
use anyhow::Result;
use cinewheel_models::{Film, FilterState, RatingVector};
use serde_json;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::warn;

/// Explicit session context: the film list, the persisted filter state and
/// the per-user store, passed to each operation instead of living in
/// ambient globals.
pub struct CatalogSession {
    films: Vec<Film>,
    pub filter: FilterState,
    store: StoreRouter,
    filter_state_path: PathBuf,
}

impl CatalogSession {
    /// Build a session; the filter state is restored from its local file
    /// (missing or corrupted file falls back to defaults).
    pub fn new(films: Vec<Film>, store: StoreRouter, filter_state_path: PathBuf) -> Self {
        let filter = Self::load_filter_state(&filter_state_path);
        Self {
            films,
            filter,
            store,
            filter_state_path,
        }
    }

    fn load_filter_state(path: &PathBuf) -> FilterState {
        if !path.exists() {
            return FilterState::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Corrupted filter state {:?}: {}. Using defaults.", path, e);
                    FilterState::default()
                }
            },
            Err(e) => {
                warn!("Failed to read filter state {:?}: {}", path, e);
                FilterState::default()
            }
        }
    }

    /// Persist the current filter state. Best-effort: losing it only costs
    /// the restored filters on the next start.
    pub fn save_filter_state(&self) {
        let write = || -> Result<()> {
            if let Some(parent) = self.filter_state_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&self.filter)?;
            std::fs::write(&self.filter_state_path, json)?;
            Ok(())
        };
        if let Err(e) = write() {
            warn!("Failed to save filter state: {}", e);
        }
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn set_films(&mut self, films: Vec<Film>) {
        self.films = films;
    }

    pub fn film(&self, id: u32) -> Option<&Film> {
        self.films.iter().find(|f| f.id == id)
    }

    pub fn store(&self) -> &StoreRouter {
        &self.store
    }

    /// Distinct genres across the catalog, sorted (the genre dropdown).
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .films
            .iter()
            .flat_map(|f| f.genres.iter().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        genres.sort_by_key(|g| g.to_lowercase());
        genres
    }

    /// Filtered and sorted view of the catalog. `wheel_context` adds the
    /// exclusion-set step. Store read failures degrade to empty sets so a
    /// broken backend never breaks listing.
    pub async fn filtered(&self, wheel_context: bool) -> Vec<Film> {
        let favorites = self.store.load_favorites().await.unwrap_or_else(|e| {
            warn!("Failed to load favorites: {}", e);
            HashSet::new()
        });
        let excluded = if wheel_context {
            Some(self.store.load_excluded().await.unwrap_or_else(|e| {
                warn!("Failed to load excluded set: {}", e);
                HashSet::new()
            }))
        } else {
            None
        };

        let mut films = apply_filters(&self.films, &self.filter, &favorites, excluded.as_ref());
        sort_films(&mut films, self.filter.sort_field, self.filter.sort_direction);
        films
    }

    pub async fn toggle_favorite(&self, film_id: u32) -> Result<bool> {
        store::toggle_favorite(&self.store, film_id).await
    }

    pub async fn toggle_excluded(&self, film_id: u32) -> Result<bool> {
        store::toggle_excluded(&self.store, film_id).await
    }

    pub async fn favorites(&self) -> Result<HashSet<u32>> {
        self.store.load_favorites().await
    }

    pub async fn excluded(&self) -> Result<HashSet<u32>> {
        self.store.load_excluded().await
    }

    /// Persist a rating vector and return its composite score. The write
    /// happens before the score is reported; there is no deferred save.
    pub async fn rate(&self, film_id: u32, rating: RatingVector) -> Result<f64> {
        self.store.save_rating(film_id, &rating).await?;
        Ok(composite_score(&rating))
    }

    pub async fn rating(&self, film_id: u32) -> Result<Option<RatingVector>> {
        self.store.load_rating(film_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::LocalUserStore;
    use crate::store_router::Identity;
    use cinewheel_models::{SortDirection, SortField};
    use tempfile::TempDir;

    fn film(id: u32, title: &str, year: i32, genres: &[&str]) -> Film {
        Film {
            id,
            title: title.to_string(),
            original_title: None,
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            director: String::new(),
            duration: String::new(),
            duration_minutes: None,
            poster: String::new(),
            rating: String::new(),
            video_url: None,
            description: String::new(),
        }
    }

    fn session(dir: &TempDir, films: Vec<Film>) -> CatalogSession {
        let store = StoreRouter::new(
            Box::new(LocalUserStore::new(dir.path())),
            None,
            Identity::anonymous(),
        );
        CatalogSession::new(films, store, dir.path().join("filter_state.json"))
    }

    #[tokio::test]
    async fn filtered_view_applies_state_and_sort() {
        let dir = TempDir::new().unwrap();
        let mut session = session(
            &dir,
            vec![
                film(1, "A", 2000, &["Drama"]),
                film(2, "B", 2010, &["Comedy"]),
                film(3, "C", 2020, &["Drama"]),
            ],
        );
        session.filter.year_from = "2005".to_string();
        session.filter.sort_field = SortField::Year;
        session.filter.sort_direction = SortDirection::Desc;

        let films = session.filtered(false).await;
        let ids: Vec<u32> = films.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn wheel_context_drops_excluded_films() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, vec![film(1, "A", 2000, &[]), film(2, "B", 2001, &[])]);
        session.toggle_excluded(2).await.unwrap();

        let listing: Vec<u32> = session.filtered(false).await.iter().map(|f| f.id).collect();
        assert_eq!(listing, vec![1, 2]);

        let wheel: Vec<u32> = session.filtered(true).await.iter().map(|f| f.id).collect();
        assert_eq!(wheel, vec![1]);
    }

    #[tokio::test]
    async fn filter_state_persists_across_sessions() {
        let dir = TempDir::new().unwrap();
        {
            let mut s = session(&dir, Vec::new());
            s.filter.search = "matrix".to_string();
            s.filter.toggle_sort(SortField::Title);
            s.save_filter_state();
        }
        let restored = session(&dir, Vec::new());
        assert_eq!(restored.filter.search, "matrix");
        assert_eq!(restored.filter.sort_field, SortField::Title);
    }

    #[tokio::test]
    async fn rate_persists_before_reporting_score() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, vec![film(1, "A", 2000, &[])]);
        let vector = RatingVector {
            s1: 5,
            s2: 5,
            s3: 5,
            s4: 5,
            s5: 5,
            m: 5,
        };
        let score = session.rate(1, vector).await.unwrap();
        assert_eq!(score, 5.0);
        assert_eq!(session.rating(1).await.unwrap(), Some(vector));
    }

    #[tokio::test]
    async fn genre_inventory_is_distinct_and_sorted() {
        let dir = TempDir::new().unwrap();
        let session = session(
            &dir,
            vec![
                film(1, "A", 2000, &["Drama", "Crime"]),
                film(2, "B", 2001, &["comedy", "Drama"]),
            ],
        );
        assert_eq!(
            session.genres(),
            vec!["comedy".to_string(), "Crime".to_string(), "Drama".to_string()]
        );
    }
}
