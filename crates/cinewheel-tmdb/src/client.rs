use crate::api::{self, SearchResult};
use crate::error::TmdbError;
use crate::provider::MetadataProvider;
use anyhow::Result;
use async_trait::async_trait;
use cinewheel_config::TmdbConfig;
use cinewheel_models::MovieMetadata;
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    api_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        }
    }

    fn ensure_api_key(&self) -> Result<(), TmdbError> {
        if self.api_key.is_empty() {
            return Err(TmdbError::MissingApiKey);
        }
        Ok(())
    }

    /// Among search candidates, prefer an exact release-year match;
    /// otherwise keep TMDB's relevance order and take the first.
    fn choose_candidate(results: &[SearchResult], year: i32) -> Option<&SearchResult> {
        results
            .iter()
            .find(|r| r.release_year() == Some(year))
            .or_else(|| results.first())
    }

    fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path {
            Some(path) => format!("{}{}", self.image_base_url, path),
            None => String::new(),
        }
    }

    fn format_runtime(runtime: u32) -> String {
        format!("{} ч {} мин", runtime / 60, runtime % 60)
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn genre_map(&self) -> Result<HashMap<u32, String>> {
        self.ensure_api_key()?;
        let list =
            api::genre_list(&self.client, &self.api_url, &self.api_key, &self.language).await?;
        Ok(list.genres.into_iter().map(|g| (g.id, g.name)).collect())
    }

    async fn lookup(
        &self,
        title: &str,
        original_title: Option<&str>,
        year: i32,
        genres: &HashMap<u32, String>,
    ) -> Result<Option<MovieMetadata>> {
        self.ensure_api_key()?;

        let query = original_title.unwrap_or(title);
        let search = api::search_movie(
            &self.client,
            &self.api_url,
            &self.api_key,
            &self.language,
            query,
            year,
        )
        .await?;

        let candidate = match Self::choose_candidate(&search.results, year) {
            Some(candidate) => candidate.clone(),
            None => {
                debug!("TMDB search: no candidates for '{}' ({})", title, year);
                return Ok(None);
            }
        };

        let detail = api::movie_detail(
            &self.client,
            &self.api_url,
            &self.api_key,
            &self.language,
            candidate.id,
        )
        .await?;

        let genre_names = candidate
            .genre_ids
            .iter()
            .filter_map(|id| genres.get(id).cloned())
            .collect();

        Ok(Some(MovieMetadata {
            poster: self.poster_url(candidate.poster_path.as_deref()),
            genres: genre_names,
            rating: candidate
                .vote_average
                .filter(|v| *v > 0.0)
                .map(|v| format!("{:.1}", v))
                .unwrap_or_default(),
            description: candidate.overview.clone().unwrap_or_default(),
            year: candidate.release_year().unwrap_or(year),
            director: detail.director().unwrap_or_default().to_string(),
            duration: detail
                .runtime
                .map(Self::format_runtime)
                .unwrap_or_default(),
            runtime_minutes: detail.runtime,
        }))
    }
}
