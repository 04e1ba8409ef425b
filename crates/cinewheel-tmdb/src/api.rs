use crate::error::TmdbError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl SearchResult {
    /// Release year parsed from the "YYYY-MM-DD" date, if present.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

impl MovieDetail {
    pub fn director(&self) -> Option<&str> {
        self.credits
            .as_ref()?
            .crew
            .iter()
            .find(|person| person.job == "Director")
            .map(|person| person.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

async fn check_status<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, TmdbError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TmdbError::Status { status, body });
    }
    Ok(response.json().await?)
}

/// GET /search/movie?query={query}&year={year}
pub async fn search_movie(
    client: &Client,
    api_url: &str,
    api_key: &str,
    language: &str,
    query: &str,
    year: i32,
) -> Result<SearchResponse, TmdbError> {
    debug!("TMDB search: '{}' ({})", query, year);
    let response = client
        .get(format!("{}/search/movie", api_url))
        .query(&[
            ("api_key", api_key),
            ("query", query),
            ("year", &year.to_string()),
            ("language", language),
        ])
        .send()
        .await?;
    check_status(response).await
}

/// GET /movie/{id}?append_to_response=credits
pub async fn movie_detail(
    client: &Client,
    api_url: &str,
    api_key: &str,
    language: &str,
    movie_id: u64,
) -> Result<MovieDetail, TmdbError> {
    debug!("TMDB detail: movie {}", movie_id);
    let response = client
        .get(format!("{}/movie/{}", api_url, movie_id))
        .query(&[
            ("api_key", api_key),
            ("language", language),
            ("append_to_response", "credits"),
        ])
        .send()
        .await?;
    check_status(response).await
}

/// GET /genre/movie/list
pub async fn genre_list(
    client: &Client,
    api_url: &str,
    api_key: &str,
    language: &str,
) -> Result<GenreListResponse, TmdbError> {
    debug!("TMDB genre list");
    let response = client
        .get(format!("{}/genre/movie/list", api_url))
        .query(&[("api_key", api_key), ("language", language)])
        .send()
        .await?;
    check_status(response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_year_parses_iso_date() {
        let result: SearchResult = serde_json::from_value(serde_json::json!({
            "id": 603,
            "release_date": "1999-03-31"
        }))
        .unwrap();
        assert_eq!(result.release_year(), Some(1999));
    }

    #[test]
    fn release_year_tolerates_missing_or_empty_date() {
        let result: SearchResult =
            serde_json::from_value(serde_json::json!({ "id": 603 })).unwrap();
        assert_eq!(result.release_year(), None);

        let result: SearchResult =
            serde_json::from_value(serde_json::json!({ "id": 603, "release_date": "" })).unwrap();
        assert_eq!(result.release_year(), None);
    }

    #[test]
    fn director_found_by_crew_job() {
        let detail: MovieDetail = serde_json::from_value(serde_json::json!({
            "runtime": 136,
            "credits": {
                "crew": [
                    { "name": "Joel Silver", "job": "Producer" },
                    { "name": "Lana Wachowski", "job": "Director" }
                ]
            }
        }))
        .unwrap();
        assert_eq!(detail.director(), Some("Lana Wachowski"));
    }

    #[test]
    fn director_absent_when_no_credits() {
        let detail: MovieDetail =
            serde_json::from_value(serde_json::json!({ "runtime": 136 })).unwrap();
        assert_eq!(detail.director(), None);
    }
}
