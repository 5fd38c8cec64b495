// src/lib.rs
// CineHub - Movie catalog core
//
// Architecture:
// - Domain-centric: the movie/favorite model lives in `domain`
// - Observable: services publish state through watch-backed cells (`state`)
// - Explicit: no global clients, no implicit behavior; collaborators are
//   injected as Arc<dyn Trait>
// - Local-first favorites: the persisted set is the single source of truth,
//   re-read on every store change

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;
pub mod state;
pub mod util;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use domain::{Category, FavoriteRecord, Genre, MovieDetail, MovieSummary, SortMode};

pub use error::{AppError, AppResult};

pub use state::{FetchState, StateCell};

pub use services::{
    CatalogService, FavoritesService, MovieDetailState, MovieListState, SearchBarState,
    SearchController,
};

pub use repositories::{FavoriteRepository, SqliteFavoriteRepository};

pub use integrations::{CatalogApi, TmdbClient, TmdbConfig, POSTER_BASE_URL};

pub use application::{initialize, AppConfig, AppState};
