pub mod client;

pub use client::{CatalogApi, TmdbClient, TmdbConfig, POSTER_BASE_URL};
