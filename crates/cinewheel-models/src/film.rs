use serde::{Deserialize, Serialize};

/// A single catalog entry. Created once at catalog load and mutated only by
/// the enrichment merge; it lives for the session, never persisted itself
/// (only the raw external metadata is cached).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Film {
    pub id: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    pub year: i32,
    pub genres: Vec<String>,
    pub director: String,
    /// Display duration as it came from the source (e.g. "2 ч 10 мин").
    pub duration: String,
    /// Minutes derived from the external runtime or parsed from `duration`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub poster: String,
    /// Display rating (e.g. "7.8"); empty when unknown.
    pub rating: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub description: String,
}

impl Film {
    /// Key used for the external metadata cache.
    pub fn cache_key(&self) -> String {
        format!("{}_{}", self.title, self.year)
    }

    /// Title used for external search: the original title wins over the
    /// localized one when present.
    pub fn search_title(&self) -> &str {
        self.original_title.as_deref().unwrap_or(&self.title)
    }
}
