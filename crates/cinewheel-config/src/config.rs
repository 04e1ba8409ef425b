use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to the film source list (JSON). Relative paths resolve against
    /// the current directory.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    /// Per-user remote key-value store. When absent, everything stays in
    /// the local store regardless of sign-in state.
    #[serde(default)]
    pub remote: Option<RemoteStoreConfig>,

    /// Stable key of the signed-in user, if any. Set by `login`, cleared by
    /// `logout`; favorites/excluded/ratings route to the remote store while
    /// this is present.
    #[serde(default)]
    pub user_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_api_url")]
    pub api_url: String,
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_tmdb_language")]
    pub language: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "ru-RU".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_tmdb_api_url(),
            image_base_url: default_tmdb_image_base_url(),
            language: default_tmdb_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteStoreConfig {
    /// Base URL of the realtime-database style store; user data lives under
    /// `{base_url}/users/{user_key}/...`.
    pub base_url: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    pub fn signed_in(&self) -> bool {
        self.user_key.is_some()
    }
}
