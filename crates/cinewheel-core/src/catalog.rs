use anyhow::{Context, Result};
use cinewheel_models::Film;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Film record as it appears in the source list. The id is optional there;
/// missing ids are assigned from source order.
#[derive(Debug, Deserialize)]
struct RawFilm {
    #[serde(default)]
    id: Option<u32>,
    title: String,
    #[serde(default)]
    original_title: Option<String>,
    year: i32,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    director: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    poster: String,
    #[serde(default)]
    rating: String,
    #[serde(default, rename = "videoUrl")]
    video_url: Option<String>,
    #[serde(default)]
    description: String,
}

/// Load the static film list. A failure here is fatal to the command; the
/// caller renders it to the user.
pub fn load_catalog(path: &Path) -> Result<Vec<Film>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {:?}", path))?;
    let raw: Vec<RawFilm> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file {:?}", path))?;

    let films: Vec<Film> = raw
        .into_iter()
        .enumerate()
        .map(|(index, film)| Film {
            id: film.id.unwrap_or(index as u32),
            duration_minutes: parse_duration_minutes(&film.duration),
            title: film.title,
            original_title: film.original_title,
            year: film.year,
            genres: film.genres,
            director: film.director,
            duration: film.duration,
            poster: film.poster,
            rating: film.rating,
            video_url: film.video_url,
            description: film.description,
        })
        .collect();

    info!("Loaded catalog: {} films from {:?}", films.len(), path);
    Ok(films)
}

/// Parse a display duration into minutes. Accepts "2 ч 10 мин", "2h 10m",
/// "1 ч", "95 мин", "95 min" and a bare number of minutes.
pub fn parse_duration_minutes(s: &str) -> Option<u32> {
    let mut hours: Option<u32> = None;
    let mut minutes: Option<u32> = None;
    let mut pending: Option<u32> = None;

    for token in s.split_whitespace() {
        let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
        let unit = token[digits.len()..].trim();
        let value = digits.parse::<u32>().ok();

        if unit.is_empty() {
            if let Some(v) = value {
                pending = Some(v);
            }
            continue;
        }

        let value = value.or(pending.take());
        let unit_lower = unit.to_lowercase();
        if unit_lower.starts_with('ч') || unit_lower.starts_with('h') {
            hours = value.or(hours);
        } else if unit_lower.starts_with('м') || unit_lower.starts_with('m') {
            minutes = value.or(minutes);
        }
    }

    // A bare number with no unit is taken as minutes
    if hours.is_none() && minutes.is_none() {
        minutes = pending;
    }

    match (hours, minutes) {
        (None, None) => None,
        (h, m) => Some(h.unwrap_or(0) * 60 + m.unwrap_or(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_russian_duration() {
        assert_eq!(parse_duration_minutes("2 ч 10 мин"), Some(130));
        assert_eq!(parse_duration_minutes("1 ч"), Some(60));
        assert_eq!(parse_duration_minutes("95 мин"), Some(95));
    }

    #[test]
    fn parses_english_duration() {
        assert_eq!(parse_duration_minutes("2h 10m"), Some(130));
        assert_eq!(parse_duration_minutes("95 min"), Some(95));
    }

    #[test]
    fn parses_bare_minutes() {
        assert_eq!(parse_duration_minutes("130"), Some(130));
    }

    #[test]
    fn empty_or_dash_duration_has_no_minutes() {
        assert_eq!(parse_duration_minutes(""), None);
        assert_eq!(parse_duration_minutes("—"), None);
    }

    #[test]
    fn missing_ids_assigned_from_source_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"title": "A", "year": 2000, "genres": ["Drama"]}},
                {{"id": 7, "title": "B", "year": 2010}},
                {{"title": "C", "year": 2020, "duration": "2 ч 5 мин"}}
            ]"#
        )
        .unwrap();

        let films = load_catalog(file.path()).unwrap();
        assert_eq!(films[0].id, 0);
        assert_eq!(films[1].id, 7);
        assert_eq!(films[2].id, 2);
        assert_eq!(films[2].duration_minutes, Some(125));
        assert_eq!(films[0].genres, vec!["Drama".to_string()]);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        assert!(load_catalog(Path::new("/nonexistent/films.json")).is_err());
    }
}
