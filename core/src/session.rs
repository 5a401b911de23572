//! Session controller: owns the observable `ViewState` and its transitions.
//!
//! # Design
//! The state lives in a `tokio::sync::watch` channel. Every transition goes
//! through `send_modify`, so a receiver always sees a whole `ViewState`,
//! never one that is half updated. The session and the fetch tasks it
//! spawns are the only writers.
//!
//! Fetches are plain spawned tasks. A second `search()` before the first one
//! finishes does not cancel or merge with it: both write the list slot and
//! the later write wins. Dropping the session does not abort in-flight tasks
//! either; they finish into a channel nobody reads.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::MAX_RESULTS_LIMIT;
use crate::repository::BooksRepository;
use crate::response::Response;
use crate::state::{Screen, TopBarMode, ViewState};
use crate::types::BookSummary;
use crate::view::Action;

/// Number of results requested per search unless configured otherwise.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

#[derive(Clone)]
pub struct Session {
    repository: Arc<dyn BooksRepository>,
    state: Arc<watch::Sender<ViewState>>,
    runtime: Handle,
    max_results: u32,
}

impl Session {
    /// Start a session with the initial `ViewState`. Fetches are spawned on
    /// `runtime`.
    pub fn new(repository: Arc<dyn BooksRepository>, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            repository,
            state: Arc::new(state),
            runtime,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Override the page size sent with every search, clamped to what the
    /// catalog accepts. `Config` rejects out-of-range values before they
    /// get here; direct callers get a warning instead.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        let clamped = max_results.clamp(1, MAX_RESULTS_LIMIT);
        if clamped != max_results {
            warn!(requested = max_results, clamped, "page size out of range");
        }
        self.max_results = clamped;
        self
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn set_search_query(&self, text: impl Into<String>) {
        let text = text.into();
        transition(&self.state, "set_search_query", |state| state.search_query = text);
    }

    pub fn set_top_bar_mode(&self, mode: TopBarMode) {
        transition(&self.state, "set_top_bar_mode", |state| state.top_bar = mode);
    }

    pub fn set_screen(&self, screen: Screen) {
        transition(&self.state, "set_screen", |state| state.screen = screen);
    }

    /// Search for the current query. The list slot is Loading when this
    /// returns and reaches Success or Error when the returned task completes.
    pub fn search(&self) -> JoinHandle<()> {
        let query = self.state.borrow().search_query.clone();
        transition(&self.state, "search", |state| state.book_list = Response::Loading);

        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);
        let max_results = self.max_results;
        self.runtime.spawn(async move {
            let outcome = repository.search_books(&query, max_results).await;
            if let Err(err) = &outcome {
                warn!(%query, error = %err, "search failed");
            }
            transition(&state, "search finished", |s| s.book_list = outcome.into());
        })
    }

    /// Fetch details for `book`. Leaves the list slot untouched.
    pub fn select_book(&self, book: &BookSummary) -> JoinHandle<()> {
        self.select_book_id(&book.id)
    }

    pub fn select_book_id(&self, id: &str) -> JoinHandle<()> {
        let id = id.to_string();
        let selected = id.clone();
        transition(&self.state, "select_book", |state| {
            state.selected_book = Some(selected);
            state.book_details = Response::Loading;
        });

        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);
        self.runtime.spawn(async move {
            let outcome = repository.fetch_book_details(&id).await;
            if let Err(err) = &outcome {
                warn!(%id, error = %err, "volume fetch failed");
            }
            transition(&state, "select_book finished", |s| s.book_details = outcome.into());
        })
    }

    /// Apply a navigation action, keeping screen and top bar paired.
    /// Returns the fetch task when the action started one.
    pub fn dispatch(&self, action: Action) -> Option<JoinHandle<()>> {
        debug!(?action, "dispatch");
        match action {
            Action::OpenSearch => {
                self.set_top_bar_mode(TopBarMode::Search);
                None
            }
            Action::UpdateQuery(text) => {
                self.set_search_query(text);
                None
            }
            Action::SubmitSearch => {
                self.set_screen(Screen::Home);
                Some(self.search())
            }
            Action::OpenBook(id) => {
                let task = self.select_book_id(&id);
                self.navigate(Screen::Details, TopBarMode::Details);
                Some(task)
            }
            Action::Back => {
                self.back();
                None
            }
            Action::RetrySearch => Some(self.search()),
            Action::RetryDetails => {
                let selected = self.state.borrow().selected_book.clone();
                match selected {
                    Some(id) => Some(self.select_book_id(&id)),
                    None => {
                        self.back();
                        None
                    }
                }
            }
        }
    }

    fn back(&self) {
        let top_bar = self.state.borrow().top_bar;
        if top_bar == TopBarMode::Details {
            self.navigate(Screen::Home, TopBarMode::Search);
        } else {
            self.set_top_bar_mode(TopBarMode::Default);
        }
    }

    /// Screen and top bar in one transition.
    fn navigate(&self, screen: Screen, top_bar: TopBarMode) {
        transition(&self.state, "navigate", |state| {
            state.screen = screen;
            state.top_bar = top_bar;
        });
    }
}

fn transition(state: &watch::Sender<ViewState>, name: &'static str, apply: impl FnOnce(&mut ViewState)) {
    state.send_modify(apply);
    debug!(transition = name, "state published");
}
