// src/application/state.rs

use std::path::PathBuf;
use std::sync::Arc;

use crate::db::{create_connection_pool, create_connection_pool_at, get_connection, initialize_database};
use crate::error::AppResult;
use crate::integrations::tmdb::{TmdbClient, TmdbConfig};
use crate::repositories::SqliteFavoriteRepository;
use crate::services::{CatalogService, FavoritesService, SearchController};

/// Application configuration. Everything is explicit: the remote client is
/// built from the config passed in here, never from process-wide state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,

    /// Database file override. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            tmdb: TmdbConfig::new(api_key),
            database_path: None,
        }
    }
}

/// Application state handed to the display layer.
/// All fields are Arc-wrapped for thread-safe sharing.
pub struct AppState {
    pub catalog_service: Arc<CatalogService>,
    pub favorites_service: Arc<FavoritesService>,
    pub search_controller: Arc<SearchController>,
}

/// Build the full service graph: pool, schema, favorites repository, remote
/// client, services.
///
/// Must be called from within a tokio runtime (the favorites service starts
/// its store watchers on construction).
pub fn initialize(config: AppConfig) -> AppResult<AppState> {
    let pool = match &config.database_path {
        Some(path) => create_connection_pool_at(path)?,
        None => create_connection_pool()?,
    };

    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }

    let repo = Arc::new(SqliteFavoriteRepository::new(Arc::new(pool)));
    let api = Arc::new(TmdbClient::new(config.tmdb));

    let catalog_service = Arc::new(CatalogService::new(api));
    let favorites_service = Arc::new(FavoritesService::new(repo));
    let search_controller = Arc::new(SearchController::new(Arc::clone(&catalog_service)));

    Ok(AppState {
        catalog_service,
        favorites_service,
        search_controller,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_builds_the_service_graph() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::new("test_key");
        config.database_path = Some(dir.path().join("cinehub.db"));

        let state = initialize(config).unwrap();

        // Fresh store: nothing favorited
        assert!(state.favorites_service.favorite_ids().is_empty());
        // Nothing fetched yet
        assert!(state
            .catalog_service
            .category_state(crate::domain::Category::Popular)
            .is_idle());
    }
}
