use crate::catalog::parse_duration_minutes;
use crate::metadata_cache::MetadataCache;
use cinewheel_models::{Film, MovieMetadata};
use cinewheel_tmdb::MetadataProvider;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort metadata enrichment: cache-first lookup against the external
/// provider, merged into the film without ever failing it. A whole-list run
/// carries a generation number so that a run superseded mid-flight is
/// discarded instead of clobbering newer state.
pub struct Enricher {
    provider: Arc<dyn MetadataProvider>,
    cache: Arc<MetadataCache>,
    generation: AtomicU64,
}

impl Enricher {
    pub fn new(provider: Arc<dyn MetadataProvider>, cache: Arc<MetadataCache>) -> Self {
        Self {
            provider,
            cache,
            generation: AtomicU64::new(0),
        }
    }

    /// Genre id -> name map through its own 7-day cache entry. A provider
    /// failure degrades to an empty map (genre names are then simply not
    /// resolved), never to an error.
    pub async fn genre_map(&self) -> HashMap<u32, String> {
        if let Some(genres) = self.cache.load_genres() {
            return genres;
        }
        match self.provider.genre_map().await {
            Ok(genres) => {
                self.cache.save_genres(&genres);
                genres
            }
            Err(e) => {
                warn!("Failed to fetch genre list: {}", e);
                HashMap::new()
            }
        }
    }

    /// Enrich one film. Cache hit skips the network entirely; a lookup
    /// failure or empty result returns the film with only its own fields.
    pub async fn enrich_film(&self, film: Film, genres: &HashMap<u32, String>) -> Film {
        let key = film.cache_key();

        if let Some(metadata) = self.cache.lookup(&key) {
            return merge(film, &metadata);
        }

        match self
            .provider
            .lookup(
                &film.title,
                film.original_title.as_deref(),
                film.year,
                genres,
            )
            .await
        {
            Ok(Some(metadata)) => {
                // The raw result is cached regardless of what the merge uses
                self.cache.store(&key, &metadata);
                merge(film, &metadata)
            }
            Ok(None) => {
                debug!("No external match for '{}' ({})", film.title, film.year);
                fallback(film)
            }
            Err(e) => {
                warn!("Enrichment failed for '{}' ({}): {}", film.title, film.year, e);
                fallback(film)
            }
        }
    }

    /// Merge from the cache only, no network. Used by views that render a
    /// single film and should never wait on a lookup.
    pub fn enrich_from_cache(&self, film: Film) -> Film {
        match self.cache.lookup(&film.cache_key()) {
            Some(metadata) => merge(film, &metadata),
            None => fallback(film),
        }
    }

    /// Enrich the whole list; lookups run concurrently and the result is
    /// used only once all of them settle. `on_progress` fires as each film
    /// settles. Returns None when another `enrich_all` started while this
    /// one was in flight: the stale result must be dropped by the caller.
    pub async fn enrich_all<F>(&self, films: Vec<Film>, on_progress: F) -> Option<Vec<Film>>
    where
        F: Fn() + Sync,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let genres = self.genre_map().await;
        let genres = &genres;
        let on_progress = &on_progress;

        let enriched = join_all(films.into_iter().map(|film| async move {
            let film = self.enrich_film(film, genres).await;
            on_progress();
            film
        }))
        .await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale enrichment run (generation {})", generation);
            return None;
        }
        Some(enriched)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Merge policy: external values fill gaps only. The film's own non-empty
/// field always wins; this includes genres (editorial curation beats
/// generic tagging) and director.
fn merge(mut film: Film, metadata: &MovieMetadata) -> Film {
    if non_empty(&film.poster).is_none() {
        film.poster = metadata.poster.clone();
    }
    if film.genres.is_empty() {
        film.genres = metadata.genres.clone();
    }
    if non_empty(&film.rating).is_none() {
        film.rating = metadata.rating.clone();
    }
    if non_empty(&film.description).is_none() {
        film.description = metadata.description.clone();
    }
    if non_empty(&film.director).is_none() {
        film.director = metadata.director.clone();
    }
    if non_empty(&film.duration).is_none() {
        film.duration = metadata.duration.clone();
    }
    film.duration_minutes = metadata
        .runtime_minutes
        .or_else(|| parse_duration_minutes(&film.duration));
    film
}

/// No external data: derive what can be derived locally.
fn fallback(mut film: Film) -> Film {
    if film.duration_minutes.is_none() {
        film.duration_minutes = parse_duration_minutes(&film.duration);
    }
    film
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    struct CountingProvider {
        lookups: AtomicUsize,
        result: Option<MovieMetadata>,
    }

    impl CountingProvider {
        fn new(result: Option<MovieMetadata>) -> Self {
            Self {
                lookups: AtomicUsize::new(0),
                result,
            }
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataProvider for CountingProvider {
        async fn genre_map(&self) -> Result<HashMap<u32, String>> {
            Ok(HashMap::new())
        }

        async fn lookup(
            &self,
            _title: &str,
            _original_title: Option<&str>,
            _year: i32,
            _genres: &HashMap<u32, String>,
        ) -> Result<Option<MovieMetadata>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            // Let other runs interleave, like a real network call would
            tokio::task::yield_now().await;
            Ok(self.result.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl MetadataProvider for FailingProvider {
        async fn genre_map(&self) -> Result<HashMap<u32, String>> {
            Err(anyhow::anyhow!("network down"))
        }

        async fn lookup(
            &self,
            _title: &str,
            _original_title: Option<&str>,
            _year: i32,
            _genres: &HashMap<u32, String>,
        ) -> Result<Option<MovieMetadata>> {
            Err(anyhow::anyhow!("network down"))
        }
    }

    fn film(title: &str, year: i32) -> Film {
        Film {
            id: 1,
            title: title.to_string(),
            original_title: None,
            year,
            genres: Vec::new(),
            director: String::new(),
            duration: String::new(),
            duration_minutes: None,
            poster: String::new(),
            rating: String::new(),
            video_url: None,
            description: String::new(),
        }
    }

    fn metadata() -> MovieMetadata {
        MovieMetadata {
            poster: "https://image.example/p.jpg".to_string(),
            genres: vec!["Drama".to_string(), "Crime".to_string()],
            rating: "8.9".to_string(),
            description: "external description".to_string(),
            year: 2000,
            director: "External Director".to_string(),
            duration: "2 ч 10 мин".to_string(),
            runtime_minutes: Some(130),
        }
    }

    fn cache(dir: &TempDir) -> Arc<MetadataCache> {
        Arc::new(MetadataCache::open(
            dir.path().join("tmdb_cache.json"),
            dir.path().join("tmdb_genres.json"),
        ))
    }

    #[tokio::test]
    async fn fresh_cache_entry_suppresses_external_call() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        cache.store("A_2000", &metadata());

        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Enricher::new(provider.clone(), cache);

        let enriched = enricher.enrich_film(film("A", 2000), &HashMap::new()).await;
        assert_eq!(provider.lookup_count(), 0);
        assert_eq!(enriched.director, "External Director");
    }

    #[tokio::test]
    async fn expired_cache_entry_triggers_fresh_call() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        cache.insert_with_timestamp("A_2000", metadata(), Utc::now() - Duration::days(8));

        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Enricher::new(provider.clone(), cache);

        enricher.enrich_film(film("A", 2000), &HashMap::new()).await;
        assert_eq!(provider.lookup_count(), 1);
    }

    #[tokio::test]
    async fn lookup_failure_returns_film_unmodified() {
        let dir = TempDir::new().unwrap();
        let enricher = Enricher::new(Arc::new(FailingProvider), cache(&dir));

        let mut original = film("A", 2000);
        original.duration = "1 ч 30 мин".to_string();
        let enriched = enricher
            .enrich_film(original.clone(), &HashMap::new())
            .await;
        assert_eq!(enriched.title, original.title);
        assert!(enriched.poster.is_empty());
        // Minutes still derived from the film's own display duration
        assert_eq!(enriched.duration_minutes, Some(90));
    }

    #[tokio::test]
    async fn merge_fills_gaps_but_own_fields_win() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Enricher::new(provider, cache(&dir));

        let mut original = film("A", 2000);
        original.genres = vec!["Авторское кино".to_string()];
        original.director = "Local Director".to_string();
        original.rating = "9.9".to_string();

        let enriched = enricher.enrich_film(original, &HashMap::new()).await;
        // Own values win
        assert_eq!(enriched.genres, vec!["Авторское кино".to_string()]);
        assert_eq!(enriched.director, "Local Director");
        assert_eq!(enriched.rating, "9.9");
        // Gaps filled from outside
        assert_eq!(enriched.poster, "https://image.example/p.jpg");
        assert_eq!(enriched.description, "external description");
        assert_eq!(enriched.duration_minutes, Some(130));
    }

    #[tokio::test]
    async fn raw_result_is_cached_even_when_nothing_was_filled() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Enricher::new(provider.clone(), cache.clone());

        let mut full = film("A", 2000);
        full.poster = "local.jpg".to_string();
        full.genres = vec!["Drama".to_string()];
        full.rating = "7.0".to_string();
        full.description = "own".to_string();
        full.director = "Own".to_string();
        full.duration = "1 ч 40 мин".to_string();

        enricher.enrich_film(full, &HashMap::new()).await;
        assert_eq!(cache.lookup("A_2000"), Some(metadata()));
    }

    #[tokio::test]
    async fn superseded_run_is_discarded() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Arc::new(Enricher::new(provider, cache(&dir)));

        let first = enricher.clone();
        let films = vec![film("A", 2000)];
        let first_run = first.enrich_all(films.clone(), || {});

        // A second run starts before the first is consumed
        let second_run = enricher.enrich_all(films, || {});

        let (first_result, second_result) = tokio::join!(first_run, second_run);
        // Only the newest run survives
        assert!(first_result.is_none());
        assert!(second_result.is_some());
    }

    #[tokio::test]
    async fn enrich_all_enriches_every_film() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Enricher::new(provider, cache(&dir));

        let films = vec![film("A", 2000), film("B", 2001), film("C", 2002)];
        let progressed = AtomicUsize::new(0);
        let enriched = enricher
            .enrich_all(films, || {
                progressed.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();
        assert_eq!(enriched.len(), 3);
        assert_eq!(progressed.load(Ordering::SeqCst), 3);
        assert!(enriched.iter().all(|f| f.duration_minutes == Some(130)));
    }

    #[tokio::test]
    async fn cache_only_merge_never_touches_the_network() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        cache.store("A_2000", &metadata());

        let provider = Arc::new(CountingProvider::new(Some(metadata())));
        let enricher = Enricher::new(provider.clone(), cache);

        let hit = enricher.enrich_from_cache(film("A", 2000));
        assert_eq!(hit.director, "External Director");

        let miss = enricher.enrich_from_cache(film("B", 2001));
        assert!(miss.director.is_empty());
        assert_eq!(provider.lookup_count(), 0);
    }
}
