// src/integrations/mod.rs
//
// External Integrations Module

pub mod tmdb;

pub use tmdb::{CatalogApi, TmdbClient, TmdbConfig, POSTER_BASE_URL};
