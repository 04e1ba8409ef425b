pub mod cache;
pub mod film;
pub mod filter_state;
pub mod metadata;
pub mod rating;

pub use cache::{CacheEntry, CACHE_TTL_DAYS};
pub use film::Film;
pub use filter_state::{DurationRange, FilterState, SortDirection, SortField};
pub use metadata::MovieMetadata;
pub use rating::RatingVector;
