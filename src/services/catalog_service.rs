// src/services/catalog_service.rs
//
// Catalog aggregation service.
//
// Owns one observable fetch state per movie category, one for search results
// and one for a single movie's details. Category fetches run as independent
// tasks: each completion writes only its own cell, so one failing category
// never touches its siblings. Detail and search are single-outstanding slots
// with last-request-started-wins supersession.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{Category, MovieDetail, MovieSummary, SortMode};
use crate::integrations::tmdb::CatalogApi;
use crate::services::fetch_slot::FetchSlot;
use crate::services::sort_engine;
use crate::state::{FetchState, StateCell};

/// Fetch state of one movie list.
pub type MovieListState = FetchState<Vec<MovieSummary>>;

/// Fetch state of a single movie's details.
pub type MovieDetailState = FetchState<MovieDetail>;

/// Generic user-facing failure message. The underlying cause is logged,
/// never published.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,

    now_playing: StateCell<MovieListState>,
    popular: StateCell<MovieListState>,
    top_rated: StateCell<MovieListState>,
    upcoming: StateCell<MovieListState>,

    searched: StateCell<MovieListState>,
    details: StateCell<MovieDetailState>,

    sort_mode: StateCell<Option<SortMode>>,

    /// Tasks of in-flight category fetches. Racing refreshes may both be in
    /// here; the last writer per category wins.
    category_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Bumped only by dispose(). A category task commits its write only if
    /// the epoch it started under is still current.
    category_epoch: Arc<Mutex<u64>>,

    search_slot: Arc<FetchSlot>,
    detail_slot: Arc<FetchSlot>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            now_playing: StateCell::new(FetchState::Idle),
            popular: StateCell::new(FetchState::Idle),
            top_rated: StateCell::new(FetchState::Idle),
            upcoming: StateCell::new(FetchState::Idle),
            searched: StateCell::new(FetchState::Idle),
            details: StateCell::new(FetchState::Idle),
            sort_mode: StateCell::new(None),
            category_tasks: Mutex::new(Vec::new()),
            category_epoch: Arc::new(Mutex::new(0)),
            search_slot: Arc::new(FetchSlot::new()),
            detail_slot: Arc::new(FetchSlot::new()),
        }
    }

    fn category_cell(&self, category: Category) -> &StateCell<MovieListState> {
        match category {
            Category::NowPlaying => &self.now_playing,
            Category::Popular => &self.popular,
            Category::TopRated => &self.top_rated,
            Category::Upcoming => &self.upcoming,
        }
    }

    // ========================================================================
    // Category aggregation
    // ========================================================================

    /// Refresh all four category lists.
    ///
    /// Every category cell goes to `Loading` immediately, then one task per
    /// category fetches and settles its own cell to `Success` or `Error`
    /// independently of the other three. A prior in-flight refresh is not
    /// cancelled; completions race and the last writer per category wins.
    pub fn refresh_all_categories(&self) {
        for category in Category::ALL {
            self.category_cell(category).set(FetchState::Loading);
        }

        let mut tasks = self.category_tasks.lock().unwrap();
        tasks.retain(|task| !task.is_finished());

        let epoch_started = *self.category_epoch.lock().unwrap();

        for category in Category::ALL {
            let api = Arc::clone(&self.api);
            let cell = self.category_cell(category).clone();
            let epoch = Arc::clone(&self.category_epoch);

            tasks.push(tokio::spawn(async move {
                let state = match api.fetch_category(category).await {
                    Ok(movies) => FetchState::Success(movies),
                    Err(err) => {
                        log::error!(
                            "Failed to fetch {} movies: {}",
                            category.query_key(),
                            err
                        );
                        FetchState::error(GENERIC_ERROR_MESSAGE)
                    }
                };

                let current = epoch.lock().unwrap();
                if *current == epoch_started {
                    cell.set(state);
                }
            }));
        }
    }

    // ========================================================================
    // Detail / search slots
    // ========================================================================

    /// Fetch the details of one movie.
    ///
    /// A newer call supersedes any in-flight detail fetch: the old task is
    /// aborted and its final write refused, so stale details never overwrite
    /// a newer request's result.
    pub fn fetch_movie_details(&self, movie_id: i64) {
        let token = self.detail_slot.begin();
        self.details.set(FetchState::Loading);

        let api = Arc::clone(&self.api);
        let cell = self.details.clone();
        let slot = Arc::clone(&self.detail_slot);

        let handle = tokio::spawn(async move {
            let state = match api.fetch_movie_detail(movie_id).await {
                Ok(detail) => FetchState::Success(detail),
                Err(err) => {
                    log::error!("Failed to fetch details for movie {}: {}", movie_id, err);
                    FetchState::error(GENERIC_ERROR_MESSAGE)
                }
            };
            slot.commit(token, || cell.set(state));
        });

        self.detail_slot.attach(token, handle);
    }

    /// Search the remote catalog.
    ///
    /// Same supersession discipline as details: submitting a new query while
    /// one is in flight cancels the previous fetch, and the published state
    /// reflects the newest query's outcome only.
    pub fn search_movies(&self, query: &str) {
        let token = self.search_slot.begin();
        self.searched.set(FetchState::Loading);

        let api = Arc::clone(&self.api);
        let cell = self.searched.clone();
        let slot = Arc::clone(&self.search_slot);
        let query = query.to_string();

        let handle = tokio::spawn(async move {
            let state = match api.search_movies(&query).await {
                Ok(movies) => FetchState::Success(movies),
                Err(err) => {
                    log::error!("Failed to search movies for {:?}: {}", query, err);
                    FetchState::error(GENERIC_ERROR_MESSAGE)
                }
            };
            slot.commit(token, || cell.set(state));
        });

        self.search_slot.attach(token, handle);
    }

    /// Cancel any in-flight search and reset the search state to `Idle`.
    pub fn reset_search(&self) {
        self.search_slot.cancel();
        self.searched.set(FetchState::Idle);
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Re-sort all four category lists with one shared comparator.
    ///
    /// A no-op unless every category currently holds data: partial sorting
    /// would leave the tabs mutually inconsistent. The sorted lists are
    /// computed first and then published, one cell after the other, as a
    /// single logical step.
    pub fn apply_sort_mode(&self, mode: SortMode) {
        self.sort_mode.set(Some(mode));

        let states = (
            self.now_playing.get(),
            self.popular.get(),
            self.top_rated.get(),
            self.upcoming.get(),
        );

        let (
            FetchState::Success(mut now_playing),
            FetchState::Success(mut popular),
            FetchState::Success(mut top_rated),
            FetchState::Success(mut upcoming),
        ) = states
        else {
            return;
        };

        sort_engine::sort_movies(&mut now_playing, mode);
        sort_engine::sort_movies(&mut popular, mode);
        sort_engine::sort_movies(&mut top_rated, mode);
        sort_engine::sort_movies(&mut upcoming, mode);

        self.now_playing.set(FetchState::Success(now_playing));
        self.popular.set(FetchState::Success(popular));
        self.top_rated.set(FetchState::Success(top_rated));
        self.upcoming.set(FetchState::Success(upcoming));
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Snapshot of one category's state.
    pub fn category_state(&self, category: Category) -> MovieListState {
        self.category_cell(category).get()
    }

    /// Subscribe to one category's state.
    pub fn subscribe_category(&self, category: Category) -> watch::Receiver<MovieListState> {
        self.category_cell(category).subscribe()
    }

    pub fn search_state(&self) -> MovieListState {
        self.searched.get()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<MovieListState> {
        self.searched.subscribe()
    }

    pub fn detail_state(&self) -> MovieDetailState {
        self.details.get()
    }

    pub fn subscribe_details(&self) -> watch::Receiver<MovieDetailState> {
        self.details.subscribe()
    }

    pub fn current_sort_mode(&self) -> Option<SortMode> {
        self.sort_mode.get()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Cancel every task this service owns.
    ///
    /// Safe to call repeatedly and when nothing is in flight. Category tasks
    /// that already left their await point are fenced by the epoch bump and
    /// cannot commit.
    pub fn dispose(&self) {
        {
            let mut epoch = self.category_epoch.lock().unwrap();
            *epoch += 1;
        }

        let mut tasks = self.category_tasks.lock().unwrap();
        for task in tasks.drain(..) {
            task.abort();
        }
        drop(tasks);

        self.search_slot.cancel();
        self.detail_slot.cancel();
    }
}

impl Drop for CatalogService {
    fn drop(&mut self) {
        self.dispose();
    }
}
