use anyhow::Result;
use dirs;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("CINEWHEEL_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    cache_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinewheel");

        Ok(Self {
            config_dir: base_dir.clone(),
            data_dir: base_dir.join("data"),
            cache_dir: base_dir.join("cache"),
        })
    }

    pub fn from_docker_env() -> Self {
        let base = container_base_path();
        // In containers config files live at the base path, data/cache in subdirs
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            cache_dir: base.join("cache"),
        }
    }

    /// Build a manager rooted at an explicit directory (used by tests).
    pub fn from_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.join("data"),
            cache_dir: base.join("cache"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// TMDB lookup results, keyed by "{title}_{year}".
    pub fn metadata_cache_file(&self) -> PathBuf {
        self.cache_dir.join("tmdb_cache.json")
    }

    /// TMDB genre id -> name map, cached on the same 7-day clock.
    pub fn genre_cache_file(&self) -> PathBuf {
        self.cache_dir.join("tmdb_genres.json")
    }

    /// Persisted filter/sort state. Always local, never user-scoped.
    pub fn filter_state_file(&self) -> PathBuf {
        self.data_dir.join("filter_state.json")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Presence of the container base directory indicates we run in Docker
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}
