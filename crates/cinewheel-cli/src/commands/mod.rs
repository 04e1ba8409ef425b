pub mod clear;
pub mod config;
pub mod enrich;
pub mod list;
pub mod rate;
pub mod show;
pub mod user;
pub mod wheel;

use anyhow::{Context, Result};
use cinewheel_config::{Config, PathManager};
use cinewheel_core::local_store::LocalUserStore;
use cinewheel_core::remote_store::RemoteUserStore;
use cinewheel_core::{
    load_catalog, CatalogSession, Enricher, Identity, MetadataCache, StoreRouter, UserDataStore,
};
use cinewheel_models::{DurationRange, FilterState, SortField};
use cinewheel_tmdb::TmdbClient;
use clap::{ArgAction, Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs: resolved paths plus the loaded config.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        paths.ensure_directories()?;
        let config = Config::load(&paths.config_file())?;
        Ok(Self { paths, config })
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.paths.config_file())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.config
            .catalog
            .clone()
            .unwrap_or_else(|| self.paths.data_dir().join("films.json"))
    }

    pub fn metadata_cache(&self) -> Arc<MetadataCache> {
        Arc::new(MetadataCache::open(
            self.paths.metadata_cache_file(),
            self.paths.genre_cache_file(),
        ))
    }

    pub fn enricher(&self) -> Enricher {
        let client = TmdbClient::new(&self.config.tmdb);
        Enricher::new(Arc::new(client), self.metadata_cache())
    }

    fn store_router(&self) -> StoreRouter {
        let local: Box<dyn UserDataStore> = Box::new(LocalUserStore::new(self.paths.data_dir()));

        let identity = match &self.config.user_key {
            Some(key) => Identity::signed_in(key),
            None => Identity::anonymous(),
        };

        // The remote backend needs both a base URL and a user key; without
        // either, every call routes to the local store.
        let remote: Option<Box<dyn UserDataStore>> = match (&self.config.remote, &self.config.user_key) {
            (Some(remote), Some(key)) => Some(Box::new(RemoteUserStore::new(
                reqwest::Client::new(),
                &remote.base_url,
                key,
            ))),
            _ => None,
        };

        StoreRouter::new(local, remote, identity)
    }

    /// Build a session over the catalog, with cached external metadata
    /// merged in. Never touches the network.
    pub fn session(&self) -> Result<CatalogSession> {
        let path = self.catalog_path();
        let films = load_catalog(&path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?;

        let enricher = self.enricher();
        let films = films
            .into_iter()
            .map(|film| enricher.enrich_from_cache(film))
            .collect();

        Ok(CatalogSession::new(
            films,
            self.store_router(),
            self.paths.filter_state_file(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Year,
    Title,
    Genre,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Year => SortField::Year,
            SortArg::Title => SortField::Title,
            SortArg::Genre => SortField::Genre,
        }
    }
}

/// Filter flags shared by `list` and `wheel`. Applied on top of the saved
/// filter state and persisted back, so they carry over between invocations.
#[derive(Args)]
pub struct FilterArgs {
    /// Substring to match in film titles (case-insensitive)
    #[arg(long)]
    search: Option<String>,

    /// Earliest release year to include
    #[arg(long, value_name = "YEAR")]
    year_from: Option<String>,

    /// Latest release year to include
    #[arg(long, value_name = "YEAR")]
    year_to: Option<String>,

    /// Minimum duration in minutes
    #[arg(long, value_name = "MINUTES")]
    min_duration: Option<u32>,

    /// Maximum duration in minutes
    #[arg(long, value_name = "MINUTES")]
    max_duration: Option<u32>,

    /// Genre to match (repeat the flag; a film matches if it has any of them)
    #[arg(long = "genre", value_name = "GENRE")]
    genres: Vec<String>,

    /// Only show favorites
    #[arg(long, action = ArgAction::SetTrue)]
    favorites: bool,

    /// Sort by this field; choosing the already-active field flips the direction
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Clear all saved filters (keeps the sort order)
    #[arg(long, action = ArgAction::SetTrue)]
    reset: bool,
}

impl FilterArgs {
    pub fn apply(&self, state: &mut FilterState) {
        if self.reset {
            state.reset();
        }
        if let Some(search) = &self.search {
            state.search = search.clone();
        }
        if let Some(from) = &self.year_from {
            state.year_from = from.clone();
        }
        if let Some(to) = &self.year_to {
            state.year_to = to.clone();
        }
        if self.min_duration.is_some() || self.max_duration.is_some() {
            let current = state.duration.unwrap_or(DurationRange {
                min: 0,
                max: u32::MAX,
            });
            state.duration = Some(DurationRange {
                min: self.min_duration.unwrap_or(current.min),
                max: self.max_duration.unwrap_or(current.max),
            });
        }
        if !self.genres.is_empty() {
            state.genres = self.genres.clone();
        }
        if self.favorites {
            state.favorites_only = true;
        }
        if let Some(sort) = self.sort {
            state.toggle_sort(sort.into());
        }
    }
}
