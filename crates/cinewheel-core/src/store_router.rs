use crate::store::UserDataStore;
use anyhow::Result;
use async_trait::async_trait;
use cinewheel_models::RatingVector;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Current sign-in state: the stable per-user key, or None when anonymous.
/// Shared so that a sign-in/sign-out flips every store call from the next
/// one on.
#[derive(Clone, Default)]
pub struct Identity {
    user_key: Arc<RwLock<Option<String>>>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_key: &str) -> Self {
        let identity = Self::default();
        identity.sign_in(user_key);
        identity
    }

    pub fn sign_in(&self, user_key: &str) {
        *self.user_key.write().unwrap() = Some(user_key.to_string());
    }

    pub fn sign_out(&self) {
        *self.user_key.write().unwrap() = None;
    }

    pub fn current(&self) -> Option<String> {
        self.user_key.read().unwrap().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_key.read().unwrap().is_some()
    }
}

/// Routes every call to exactly one backend, re-checking identity each
/// time. Anonymous-local data is abandoned on sign-in and remote data on
/// sign-out; nothing is merged (intentional, see the documenting test).
///
/// Remote write failures are logged and swallowed: the optimistic local
/// view may then disagree with remote truth until the next write.
pub struct StoreRouter {
    local: Box<dyn UserDataStore>,
    remote: Option<Box<dyn UserDataStore>>,
    identity: Identity,
}

impl StoreRouter {
    pub fn new(
        local: Box<dyn UserDataStore>,
        remote: Option<Box<dyn UserDataStore>>,
        identity: Identity,
    ) -> Self {
        Self {
            local,
            remote,
            identity,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn active(&self) -> &dyn UserDataStore {
        if self.identity.is_signed_in() {
            if let Some(remote) = &self.remote {
                return remote.as_ref();
            }
        }
        self.local.as_ref()
    }

    fn using_remote(&self) -> bool {
        self.identity.is_signed_in() && self.remote.is_some()
    }

    /// Taxonomy (c): remote persistence-write failures are logged, not
    /// surfaced, no retry, no rollback.
    fn absorb_remote_write_failure(&self, what: &str, result: Result<()>) -> Result<()> {
        match result {
            Err(e) if self.using_remote() => {
                warn!("Remote write of {} failed (change not persisted remotely): {}", what, e);
                Ok(())
            }
            other => other,
        }
    }
}

#[async_trait]
impl UserDataStore for StoreRouter {
    async fn load_favorites(&self) -> Result<HashSet<u32>> {
        self.active().load_favorites().await
    }

    async fn save_favorites(&self, favorites: &HashSet<u32>) -> Result<()> {
        let result = self.active().save_favorites(favorites).await;
        self.absorb_remote_write_failure("favorites", result)
    }

    async fn load_excluded(&self) -> Result<HashSet<u32>> {
        self.active().load_excluded().await
    }

    async fn save_excluded(&self, excluded: &HashSet<u32>) -> Result<()> {
        let result = self.active().save_excluded(excluded).await;
        self.absorb_remote_write_failure("excluded", result)
    }

    async fn load_rating(&self, film_id: u32) -> Result<Option<RatingVector>> {
        self.active().load_rating(film_id).await
    }

    async fn save_rating(&self, film_id: u32, rating: &RatingVector) -> Result<()> {
        let result = self.active().save_rating(film_id, rating).await;
        self.absorb_remote_write_failure("rating", result)
    }
}
