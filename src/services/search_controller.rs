// src/services/search_controller.rs
//
// Search bar state machine.
//
// Closed -> Opened -> Triggered -> Closed. `Triggered` is entered only by an
// explicit submission and is the only state in which the search results panel
// is rendered. The controller gates rendering; the cancellable search fetch
// itself lives in the catalog service's search slot.

use std::sync::Arc;

use tokio::sync::watch;

use crate::services::catalog_service::CatalogService;
use crate::state::StateCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchBarState {
    #[default]
    Closed,
    Opened,
    Triggered,
}

pub struct SearchController {
    catalog: Arc<CatalogService>,
    bar_state: StateCell<SearchBarState>,
    query_text: StateCell<String>,
}

impl SearchController {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self {
            catalog,
            bar_state: StateCell::new(SearchBarState::Closed),
            query_text: StateCell::new(String::new()),
        }
    }

    /// Show the search bar with an empty input and no results panel.
    pub fn open(&self) {
        self.bar_state.set(SearchBarState::Opened);
    }

    /// Close the bar: clears the input, cancels any in-flight search and
    /// resets the search state.
    pub fn close(&self) {
        self.query_text.set(String::new());
        self.catalog.reset_search();
        self.bar_state.set(SearchBarState::Closed);
    }

    /// Track the input text. Clearing the text after a search returns the
    /// bar to `Opened`; the last fetched results stay in the search cell
    /// until a new search or an explicit close.
    pub fn update_query(&self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() && self.bar_state.get() == SearchBarState::Triggered {
            self.bar_state.set(SearchBarState::Opened);
        }
        self.query_text.set(text);
    }

    /// Explicit search submission: the only transition into `Triggered`.
    ///
    /// Submitting while a search is in flight supersedes it — the previous
    /// fetch is cancelled and can never publish over the newer result.
    pub fn submit(&self, query: &str) {
        self.catalog.search_movies(query);
        self.bar_state.set(SearchBarState::Triggered);
    }

    // ========================================================================
    // Observation
    // ========================================================================

    pub fn bar_state(&self) -> SearchBarState {
        self.bar_state.get()
    }

    pub fn subscribe_bar_state(&self) -> watch::Receiver<SearchBarState> {
        self.bar_state.subscribe()
    }

    pub fn query_text(&self) -> String {
        self.query_text.get()
    }

    pub fn subscribe_query_text(&self) -> watch::Receiver<String> {
        self.query_text.subscribe()
    }
}
