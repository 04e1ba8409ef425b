use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Year,
    Title,
    Genre,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

/// The full filter/sort state shared across pages. Persisted locally as a
/// single record and restored on startup; never user-scoped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    /// Year bounds are kept as raw user input; a bound that does not parse
    /// as an integer is a no-op for that bound.
    #[serde(default)]
    pub year_from: String,
    #[serde(default)]
    pub year_to: String,
    #[serde(default)]
    pub duration: Option<DurationRange>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default = "default_sort_field")]
    pub sort_field: SortField,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: SortDirection,
}

fn default_sort_field() -> SortField {
    SortField::Year
}

fn default_sort_direction() -> SortDirection {
    SortDirection::Asc
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            year_from: String::new(),
            year_to: String::new(),
            duration: None,
            genres: Vec::new(),
            favorites_only: false,
            sort_field: SortField::Year,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl FilterState {
    /// Selecting the already-active sort field flips the direction;
    /// selecting a new field resets to ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn reset(&mut self) {
        *self = FilterState {
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            ..FilterState::default()
        };
    }
}
