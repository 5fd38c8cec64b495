// src/services/favorites_service.rs
//
// Favorites overlay service.
//
// Bridges the persisted favorites store and the displayed movie lists: it
// subscribes to the store's change notification, re-runs the queries on every
// change and republishes the results as observable state. The store stays the
// single source of truth; this service never caches it authoritatively.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{FavoriteRecord, MovieDetail, MovieSummary};
use crate::repositories::FavoriteRepository;
use crate::services::catalog_service::MovieListState;
use crate::state::{FetchState, StateCell};

/// Generic user-facing message for store subscription failures.
const LOAD_ERROR_MESSAGE: &str = "Cannot retrieve favorite movies";

pub struct FavoritesService {
    repo: Arc<dyn FavoriteRepository>,

    /// The external ids of all favorites, continuously updated. This is what
    /// calling screens use to render favorite/unfavorite affordances.
    favorite_ids: StateCell<HashSet<i64>>,

    /// All favorites mapped back to the remote-result shape, most recently
    /// saved first. `Loading` until the first store emission.
    favorite_movies: StateCell<MovieListState>,

    watcher_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl FavoritesService {
    /// Create the service and start its store watchers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(repo: Arc<dyn FavoriteRepository>) -> Self {
        let service = Self {
            repo,
            favorite_ids: StateCell::new(HashSet::new()),
            favorite_movies: StateCell::new(FetchState::Loading),
            watcher_tasks: Mutex::new(Vec::new()),
        };
        service.start_watchers();
        service
    }

    /// Spawn one watcher per store query. Each watcher queries immediately,
    /// publishes, then re-queries on every store change until the store's
    /// notification channel closes.
    fn start_watchers(&self) {
        let ids_task = {
            let repo = Arc::clone(&self.repo);
            let cell = self.favorite_ids.clone();
            let mut changes = repo.subscribe();

            tokio::spawn(async move {
                loop {
                    match repo.query_all_ids() {
                        Ok(ids) => cell.set(ids.into_iter().collect()),
                        Err(err) => log::error!("Failed to load favorite ids: {}", err),
                    }
                    if changes.changed().await.is_err() {
                        break;
                    }
                }
            })
        };

        let movies_task = {
            let repo = Arc::clone(&self.repo);
            let cell = self.favorite_movies.clone();
            let mut changes = repo.subscribe();

            tokio::spawn(async move {
                loop {
                    match repo.query_all() {
                        Ok(records) => {
                            let movies: Vec<MovieSummary> =
                                records.iter().map(FavoriteRecord::to_summary).collect();
                            cell.set(FetchState::Success(movies));
                        }
                        Err(err) => {
                            log::error!("Failed to load favorite movies: {}", err);
                            cell.set(FetchState::error(LOAD_ERROR_MESSAGE));
                        }
                    }
                    if changes.changed().await.is_err() {
                        break;
                    }
                }
            })
        };

        let mut tasks = self.watcher_tasks.lock().unwrap();
        tasks.push(ids_task);
        tasks.push(movies_task);
    }

    // ========================================================================
    // Mutations (fire-and-forget: failures are logged, never propagated)
    // ========================================================================

    /// Persist a list entry as a favorite. Safe to call for an id that is
    /// already favorited: the insert is ignored.
    pub fn add_favorite(&self, movie: &MovieSummary) {
        let record = FavoriteRecord::from_summary(movie);
        if let Err(err) = self.repo.insert_ignore(&record) {
            log::error!("Failed to add favorite {:?}: {}", record.external_id, err);
        }
    }

    /// Persist a detail payload as a favorite.
    pub fn add_favorite_detail(&self, movie: &MovieDetail) {
        let record = FavoriteRecord::from_detail(movie);
        if let Err(err) = self.repo.insert_ignore(&record) {
            log::error!("Failed to add favorite {:?}: {}", record.external_id, err);
        }
    }

    /// Remove a favorite by external id. A no-op if the id was never added.
    pub fn remove_favorite(&self, external_id: i64) {
        if let Err(err) = self.repo.delete_by_external_id(external_id) {
            log::error!("Failed to remove favorite {}: {}", external_id, err);
        }
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Snapshot of the favorite id set.
    pub fn favorite_ids(&self) -> HashSet<i64> {
        self.favorite_ids.get()
    }

    /// Subscribe to the continuously-updated favorite id set.
    pub fn subscribe_favorite_ids(&self) -> watch::Receiver<HashSet<i64>> {
        self.favorite_ids.subscribe()
    }

    pub fn is_favorite(&self, external_id: i64) -> bool {
        self.favorite_ids.get().contains(&external_id)
    }

    /// Snapshot of the favorites-as-movies state.
    pub fn favorites_state(&self) -> MovieListState {
        self.favorite_movies.get()
    }

    /// Subscribe to the favorites-as-movies state.
    pub fn subscribe_favorites(&self) -> watch::Receiver<MovieListState> {
        self.favorite_movies.subscribe()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stop the store watchers. Safe to call repeatedly.
    pub fn dispose(&self) {
        let mut tasks = self.watcher_tasks.lock().unwrap();
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for FavoritesService {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, get_connection, initialize_database};
    use crate::repositories::SqliteFavoriteRepository;

    fn test_service() -> FavoritesService {
        let pool = create_in_memory_pool().unwrap();
        {
            let conn = get_connection(&pool).unwrap();
            initialize_database(&conn).unwrap();
        }
        FavoritesService::new(Arc::new(SqliteFavoriteRepository::new(Arc::new(pool))))
    }

    fn movie(id: i64) -> MovieSummary {
        MovieSummary {
            id: Some(id),
            poster_path: Some("/p.jpg".to_string()),
            release_date: Some("2020-05-01".to_string()),
            average_rating: Some(7.2),
        }
    }

    async fn wait_for<F>(mut condition: F)
    where
        F: FnMut() -> bool,
    {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_favorites_surface_as_movies_most_recent_first() {
        let service = test_service();

        service.add_favorite(&movie(1));
        service.add_favorite(&movie(2));

        wait_for(|| {
            matches!(service.favorites_state(), FetchState::Success(ref m) if m.len() == 2)
        })
        .await;

        let FetchState::Success(movies) = service.favorites_state() else {
            panic!("expected success");
        };
        // Same shape as remote results, mapped back from the records,
        // most recently saved first
        assert_eq!(movies[0].id, Some(2));
        assert_eq!(movies[1].id, Some(1));
        assert_eq!(movies[0].poster_path.as_deref(), Some("/p.jpg"));
    }

    #[tokio::test]
    async fn test_adding_twice_persists_one_record() {
        let service = test_service();

        service.add_favorite(&movie(1));
        service.add_favorite(&movie(1));

        wait_for(|| service.favorite_ids().contains(&1)).await;

        let FetchState::Success(movies) = service.favorites_state() else {
            panic!("expected success");
        };
        assert_eq!(movies.len(), 1);
        assert_eq!(service.favorite_ids().len(), 1);
    }

    #[tokio::test]
    async fn test_id_set_tracks_adds_and_removals() {
        let service = test_service();

        service.add_favorite(&movie(1));
        service.add_favorite(&movie(2));
        wait_for(|| service.favorite_ids().len() == 2).await;
        assert!(service.is_favorite(1));

        service.remove_favorite(1);
        wait_for(|| service.favorite_ids().len() == 1).await;
        assert!(!service.is_favorite(1));
        assert!(service.is_favorite(2));
    }

    #[tokio::test]
    async fn test_removing_unknown_id_leaves_set_unchanged() {
        let service = test_service();

        service.add_favorite(&movie(1));
        wait_for(|| service.favorite_ids().len() == 1).await;

        service.remove_favorite(999);

        // Give the watcher a chance to (wrongly) react
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(service.favorite_ids(), HashSet::from([1]));
    }

    #[tokio::test]
    async fn test_detail_favorites_round_trip_through_the_store() {
        let service = test_service();

        let detail = MovieDetail {
            id: Some(7),
            backdrop_path: None,
            poster_path: Some("/d.jpg".to_string()),
            title: Some("Title".to_string()),
            tagline: None,
            release_date: Some("2011-11-11".to_string()),
            vote_average: Some(6.5),
            vote_count: Some(10),
            genres: Vec::new(),
            overview: None,
        };
        service.add_favorite_detail(&detail);

        wait_for(|| service.is_favorite(7)).await;

        let FetchState::Success(movies) = service.favorites_state() else {
            panic!("expected success");
        };
        assert_eq!(movies[0].id, Some(7));
        assert_eq!(movies[0].average_rating, Some(6.5));
        assert_eq!(movies[0].release_date.as_deref(), Some("2011-11-11"));
    }

    #[tokio::test]
    async fn test_dispose_stops_watchers() {
        let service = test_service();
        wait_for(|| service.favorites_state().is_success()).await;

        service.dispose();
        service.dispose(); // idempotent

        service.add_favorite(&movie(3));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // The store took the write, but no watcher republished it
        assert!(!service.is_favorite(3));
    }
}
