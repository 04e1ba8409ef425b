pub mod api;
pub mod client;
pub mod error;
pub mod provider;

pub use client::TmdbClient;
pub use error::TmdbError;
pub use provider::MetadataProvider;
