use anyhow::Result;
use async_trait::async_trait;
use cinewheel_models::RatingVector;
use std::collections::HashSet;

/// Per-user data: favorites, exclusions and rating vectors. Two
/// implementations exist (local files for anonymous use, a remote per-user
/// key-value store when signed in) plus the router that picks between them
/// on every call.
#[async_trait]
pub trait UserDataStore: Send + Sync {
    async fn load_favorites(&self) -> Result<HashSet<u32>>;
    async fn save_favorites(&self, favorites: &HashSet<u32>) -> Result<()>;

    async fn load_excluded(&self) -> Result<HashSet<u32>>;
    async fn save_excluded(&self, excluded: &HashSet<u32>) -> Result<()>;

    async fn load_rating(&self, film_id: u32) -> Result<Option<RatingVector>>;
    async fn save_rating(&self, film_id: u32, rating: &RatingVector) -> Result<()>;
}

/// Read-modify-write toggle. Returns the new membership state of the id.
pub async fn toggle_favorite(store: &dyn UserDataStore, film_id: u32) -> Result<bool> {
    let mut favorites = store.load_favorites().await?;
    let now_member = favorites.insert(film_id);
    if !now_member {
        favorites.remove(&film_id);
    }
    store.save_favorites(&favorites).await?;
    Ok(now_member)
}

pub async fn toggle_excluded(store: &dyn UserDataStore, film_id: u32) -> Result<bool> {
    let mut excluded = store.load_excluded().await?;
    let now_member = excluded.insert(film_id);
    if !now_member {
        excluded.remove(&film_id);
    }
    store.save_excluded(&excluded).await?;
    Ok(now_member)
}

/// Stable on-disk/on-wire shape for an id set: a sorted list.
pub(crate) fn set_to_sorted_vec(set: &HashSet<u32>) -> Vec<u32> {
    let mut ids: Vec<u32> = set.iter().copied().collect();
    ids.sort_unstable();
    ids
}
