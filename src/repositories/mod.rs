// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO cross-repository calls
// - Explicit SQL only

pub mod favorite_repository;

pub use favorite_repository::{FavoriteRepository, SqliteFavoriteRepository};
