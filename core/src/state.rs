//! The single view-state record a session publishes.
//!
//! `ViewState` is replaced as a whole on every transition; see
//! `session::Session`. Screen and top-bar mode are stored independently and
//! are only kept paired by the navigation actions in `view::Action`.

use serde::{Deserialize, Serialize};

use crate::response::Response;
use crate::types::{BookDetails, SearchResult};

/// Which body the presentation shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Nothing searched yet.
    #[default]
    Start,
    /// Search results.
    Home,
    Details,
}

/// Which layout the top bar shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopBarMode {
    /// App title and a search button.
    #[default]
    Default,
    /// Back button and the query field.
    Search,
    /// Back button only.
    Details,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search_query: String,
    pub screen: Screen,
    pub top_bar: TopBarMode,
    pub book_list: Response<SearchResult>,
    pub book_details: Response<BookDetails>,
    /// Id passed to the latest `select_book`, kept so details can be retried.
    pub selected_book: Option<String>,
}

impl ViewState {
    /// True when screen and top bar form one of the pairs navigation produces.
    pub fn is_consistent(&self) -> bool {
        matches!(
            (self.screen, self.top_bar),
            (Screen::Start, TopBarMode::Default | TopBarMode::Search)
                | (Screen::Home, TopBarMode::Default | TopBarMode::Search)
                | (Screen::Details, TopBarMode::Details)
        )
    }
}
