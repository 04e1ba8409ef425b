use cinewheel_models::{Film, FilterState, SortDirection, SortField};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Apply the conjunctive filter chain in its fixed order: search, year
/// range, duration range, genres, favorites-only, exclusions. Pure in its
/// inputs; the caller supplies the current favorite/excluded sets.
/// `excluded` is only passed in the wheel context.
pub fn apply_filters(
    films: &[Film],
    state: &FilterState,
    favorites: &HashSet<u32>,
    excluded: Option<&HashSet<u32>>,
) -> Vec<Film> {
    let mut filtered: Vec<&Film> = films.iter().collect();

    let query = state.search.trim().to_lowercase();
    if !query.is_empty() {
        filtered.retain(|film| film.title.to_lowercase().contains(&query));
    }

    if let Ok(from) = state.year_from.trim().parse::<i32>() {
        filtered.retain(|film| film.year >= from);
    }
    if let Ok(to) = state.year_to.trim().parse::<i32>() {
        filtered.retain(|film| film.year <= to);
    }

    if let Some(range) = state.duration {
        // A film with unknown duration never matches an active range
        filtered.retain(|film| match film.duration_minutes {
            Some(minutes) => minutes >= range.min && minutes <= range.max,
            None => false,
        });
    }

    if !state.genres.is_empty() {
        filtered.retain(|film| film.genres.iter().any(|g| state.genres.contains(g)));
    }

    if state.favorites_only {
        filtered.retain(|film| favorites.contains(&film.id));
    }

    if let Some(excluded) = excluded {
        filtered.retain(|film| !excluded.contains(&film.id));
    }

    filtered.into_iter().cloned().collect()
}

/// Russian collation: 'ё' sorts with 'е', not after 'я' where its code
/// point would put it. The raw lowercased string breaks ties so the order
/// stays total.
fn collation_key(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

pub fn sort_films(films: &mut [Film], field: SortField, direction: SortDirection) {
    films.sort_by(|a, b| {
        let ordering = match field {
            SortField::Year => a.year.cmp(&b.year),
            SortField::Title => compare_titles(&a.title, &b.title),
            SortField::Genre => {
                let genre_a = a.genres.first().map(String::as_str).unwrap_or("");
                let genre_b = b.genres.first().map(String::as_str).unwrap_or("");
                compare_titles(genre_a, genre_b)
            }
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinewheel_models::DurationRange;

    fn film(id: u32, title: &str, year: i32, genres: &[&str]) -> Film {
        Film {
            id,
            title: title.to_string(),
            original_title: None,
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            director: String::new(),
            duration: String::new(),
            duration_minutes: None,
            poster: String::new(),
            rating: String::new(),
            video_url: None,
            description: String::new(),
        }
    }

    fn ids(films: &[Film]) -> Vec<u32> {
        films.iter().map(|f| f.id).collect()
    }

    #[test]
    fn year_from_keeps_later_films() {
        let films = vec![film(1, "A", 2000, &["Drama"]), film(2, "B", 2010, &["Comedy"])];
        let state = FilterState {
            year_from: "2005".to_string(),
            ..FilterState::default()
        };
        let result = apply_filters(&films, &state, &HashSet::new(), None);
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn unparsable_year_bound_is_a_no_op() {
        let films = vec![film(1, "A", 2000, &[]), film(2, "B", 2010, &[])];
        let state = FilterState {
            year_from: "not-a-year".to_string(),
            year_to: " ".to_string(),
            ..FilterState::default()
        };
        let result = apply_filters(&films, &state, &HashSet::new(), None);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_substring_on_title() {
        let films = vec![film(1, "The Matrix", 1999, &[]), film(2, "Alien", 1979, &[])];
        let state = FilterState {
            search: "  mAtRix ".to_string(),
            ..FilterState::default()
        };
        let result = apply_filters(&films, &state, &HashSet::new(), None);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn unknown_duration_never_passes_an_active_range() {
        let mut with_duration = film(1, "A", 2000, &[]);
        with_duration.duration_minutes = Some(120);
        let without_duration = film(2, "B", 2000, &[]);

        let state = FilterState {
            duration: Some(DurationRange { min: 0, max: 999 }),
            ..FilterState::default()
        };
        let result = apply_filters(
            &[with_duration, without_duration],
            &state,
            &HashSet::new(),
            None,
        );
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn genre_filter_uses_or_semantics() {
        let films = vec![
            film(1, "A", 2000, &["Drama", "Crime"]),
            film(2, "B", 2000, &["Comedy"]),
            film(3, "C", 2000, &[]),
        ];
        let state = FilterState {
            genres: vec!["Crime".to_string(), "Comedy".to_string()],
            ..FilterState::default()
        };
        let result = apply_filters(&films, &state, &HashSet::new(), None);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn favorites_only_and_exclusions() {
        let films = vec![film(1, "A", 2000, &[]), film(2, "B", 2000, &[]), film(3, "C", 2000, &[])];
        let favorites: HashSet<u32> = [1, 2].into_iter().collect();
        let excluded: HashSet<u32> = [2].into_iter().collect();

        let state = FilterState {
            favorites_only: true,
            ..FilterState::default()
        };
        let result = apply_filters(&films, &state, &favorites, Some(&excluded));
        assert_eq!(ids(&result), vec![1]);

        // Outside the wheel the exclusion set is not applied
        let result = apply_filters(&films, &state, &favorites, None);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let films = vec![
            film(1, "The Matrix", 1999, &["Action"]),
            film(2, "Alien", 1979, &["Horror"]),
            film(3, "Amélie", 2001, &["Comedy"]),
        ];
        let state = FilterState {
            year_from: "1990".to_string(),
            genres: vec!["Action".to_string(), "Comedy".to_string()],
            ..FilterState::default()
        };
        let favorites = HashSet::new();
        let once = apply_filters(&films, &state, &favorites, None);
        let twice = apply_filters(&once, &state, &favorites, None);
        assert_eq!(once, twice);
    }

    #[test]
    fn sort_by_year_and_title() {
        let mut films = vec![
            film(1, "Zodiac", 2007, &[]),
            film(2, "alien", 1979, &[]),
            film(3, "Brazil", 1985, &[]),
        ];
        sort_films(&mut films, SortField::Year, SortDirection::Asc);
        assert_eq!(ids(&films), vec![2, 3, 1]);

        sort_films(&mut films, SortField::Title, SortDirection::Asc);
        assert_eq!(ids(&films), vec![2, 3, 1]); // case-insensitive: alien < Brazil < Zodiac

        sort_films(&mut films, SortField::Title, SortDirection::Desc);
        assert_eq!(ids(&films), vec![1, 3, 2]);
    }

    #[test]
    fn cyrillic_yo_sorts_with_ye_not_after_ya() {
        let mut films = vec![
            film(1, "Жизнь", 2000, &[]),
            film(2, "Ёлки", 2010, &[]),
            film(3, "Елена", 2011, &[]),
        ];
        sort_films(&mut films, SortField::Title, SortDirection::Asc);
        // Code-point order would push "Ёлки" past "Жизнь"
        assert_eq!(ids(&films), vec![3, 2, 1]);
    }

    #[test]
    fn sort_by_first_genre_puts_genreless_first() {
        let mut films = vec![
            film(1, "A", 2000, &["Drama"]),
            film(2, "B", 2000, &[]),
            film(3, "C", 2000, &["Comedy"]),
        ];
        sort_films(&mut films, SortField::Genre, SortDirection::Asc);
        assert_eq!(ids(&films), vec![2, 3, 1]);
    }
}
