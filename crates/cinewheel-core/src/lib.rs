pub mod catalog;
pub mod enrich;
pub mod filter;
pub mod local_store;
pub mod metadata_cache;
pub mod rating;
pub mod remote_store;
pub mod session;
pub mod store;
pub mod store_router;
pub mod wheel;

pub use catalog::{load_catalog, parse_duration_minutes};
pub use enrich::Enricher;
pub use filter::{apply_filters, sort_films};
pub use metadata_cache::MetadataCache;
pub use rating::{composite_score, ScoreBand};
pub use session::CatalogSession;
pub use store::UserDataStore;
pub use store_router::{Identity, StoreRouter};
pub use wheel::Wheel;
