// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod favorites_service;
pub mod search_controller;
pub mod sort_engine;

mod fetch_slot;


// Re-export all services and their types
pub use catalog_service::{CatalogService, MovieDetailState, MovieListState};

pub use favorites_service::FavoritesService;

pub use search_controller::{SearchBarState, SearchController};
