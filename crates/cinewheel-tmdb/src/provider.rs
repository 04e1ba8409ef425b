use anyhow::Result;
use async_trait::async_trait;
use cinewheel_models::MovieMetadata;
use std::collections::HashMap;

/// Seam between the enrichment pipeline and the external metadata API.
///
/// The core only talks to this trait; tests substitute a counting mock to
/// verify cache behavior without the network.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Genre id -> name map. Fetched rarely; callers cache it for 7 days.
    async fn genre_map(&self) -> Result<HashMap<u32, String>>;

    /// Resolve metadata for one film. `Ok(None)` means the search returned
    /// no candidates; that is not an error.
    async fn lookup(
        &self,
        title: &str,
        original_title: Option<&str>,
        year: i32,
        genres: &HashMap<u32, String>,
    ) -> Result<Option<MovieMetadata>>;
}
