use crate::store::{set_to_sorted_vec, UserDataStore};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cinewheel_models::RatingVector;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Signed-in backend: realtime-database style key-value paths under
/// `{base}/users/{user_key}/...`. Plain GET/PUT, no transactions; absent
/// paths come back as JSON `null`.
pub struct RemoteUserStore {
    client: Client,
    base_url: String,
    user_key: String,
}

impl RemoteUserStore {
    pub fn new(client: Client, base_url: &str, user_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_key: user_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/users/{}/{}.json", self.base_url, self.user_key, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.url(path);
        debug!("Remote store GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Remote store GET {} returned HTTP {}", url, status));
        }
        // Absent paths are the JSON literal null
        let value: Option<T> = response.json().await?;
        Ok(value)
    }

    async fn put<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let url = self.url(path);
        debug!("Remote store PUT {}", url);
        let response = self.client.put(&url).json(value).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Remote store PUT {} returned HTTP {}", url, status));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDataStore for RemoteUserStore {
    async fn load_favorites(&self) -> Result<HashSet<u32>> {
        let ids: Option<Vec<u32>> = self.get("favorites").await?;
        Ok(ids.unwrap_or_default().into_iter().collect())
    }

    async fn save_favorites(&self, favorites: &HashSet<u32>) -> Result<()> {
        self.put("favorites", &set_to_sorted_vec(favorites)).await
    }

    async fn load_excluded(&self) -> Result<HashSet<u32>> {
        let ids: Option<Vec<u32>> = self.get("excluded").await?;
        Ok(ids.unwrap_or_default().into_iter().collect())
    }

    async fn save_excluded(&self, excluded: &HashSet<u32>) -> Result<()> {
        self.put("excluded", &set_to_sorted_vec(excluded)).await
    }

    async fn load_rating(&self, film_id: u32) -> Result<Option<RatingVector>> {
        self.get(&format!("ratings/{}", film_id)).await
    }

    async fn save_rating(&self, film_id: u32, rating: &RatingVector) -> Result<()> {
        self.put(&format!("ratings/{}", film_id), rating).await
    }
}
