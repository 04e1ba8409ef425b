use serde::{Deserialize, Serialize};

/// Resolved external metadata for one film, exactly as it is cached.
///
/// This is the raw lookup result, not the merged film: caching the raw
/// result keeps the merge policy free to change without invalidating
/// existing cache entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub poster: String,
    pub genres: Vec<String>,
    pub rating: String,
    pub description: String,
    pub year: i32,
    pub director: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
}
