//! Pure projection of a `ViewState` into a UI tree the host draws.
//!
//! # Design
//! `render` has no side effects and reads nothing but its arguments, so the
//! host can call it on every published state. Interactive elements carry the
//! `Action` the host should pass back to `Session::dispatch`.

use serde::{Deserialize, Serialize};

use crate::response::Response;
use crate::state::{Screen, TopBarMode, ViewState};
use crate::types::{BookDetails, BookSummary, SearchResult};

pub const APP_TITLE: &str = "Bookshelf";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Windows at least this wide (in dp) show results as a grid.
pub const GRID_MIN_WIDTH_DP: u32 = 600;

/// Callbacks the presentation can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    OpenSearch,
    UpdateQuery(String),
    SubmitSearch,
    /// Open details for the volume with this id.
    OpenBook(String),
    Back,
    RetrySearch,
    RetryDetails,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    List,
    Grid,
}

impl Layout {
    pub fn for_width(width_dp: u32) -> Self {
        if width_dp < GRID_MIN_WIDTH_DP {
            Layout::List
        } else {
            Layout::Grid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub top_bar: TopBarView,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopBarView {
    Default { title: &'static str, on_search: Action },
    Search { query: String, on_back: Action, on_submit: Action },
    Details { on_back: Action },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Body {
    Start,
    Loading,
    Error { retry: Action },
    /// The search succeeded with no hits.
    Empty,
    Books { layout: Layout, cards: Vec<BookCard> },
    Details(DetailsView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub thumbnail: Option<String>,
    pub on_press: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsView {
    pub title: String,
    pub authors: String,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub published_year: Option<String>,
    pub publisher: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

pub fn render(state: &ViewState, layout: Layout) -> Frame {
    Frame {
        top_bar: render_top_bar(state),
        body: render_body(state, layout),
    }
}

fn render_top_bar(state: &ViewState) -> TopBarView {
    match state.top_bar {
        TopBarMode::Default => TopBarView::Default {
            title: APP_TITLE,
            on_search: Action::OpenSearch,
        },
        TopBarMode::Search => TopBarView::Search {
            query: state.search_query.clone(),
            on_back: Action::Back,
            on_submit: Action::SubmitSearch,
        },
        TopBarMode::Details => TopBarView::Details { on_back: Action::Back },
    }
}

fn render_body(state: &ViewState, layout: Layout) -> Body {
    match state.screen {
        Screen::Start => Body::Start,
        Screen::Home => match &state.book_list {
            Response::Loading => Body::Loading,
            Response::Error => Body::Error {
                retry: Action::RetrySearch,
            },
            Response::Success(result) => render_books(result, layout),
        },
        Screen::Details => match &state.book_details {
            Response::Loading => Body::Loading,
            Response::Error => Body::Error {
                retry: Action::RetryDetails,
            },
            Response::Success(details) => Body::Details(render_details(details)),
        },
    }
}

fn render_books(result: &SearchResult, layout: Layout) -> Body {
    if result.is_empty() {
        return Body::Empty;
    }
    Body::Books {
        layout,
        cards: result.items.iter().map(render_card).collect(),
    }
}

fn render_card(book: &BookSummary) -> BookCard {
    BookCard {
        id: book.id.clone(),
        title: book.title.clone(),
        authors: author_line(&book.authors),
        publisher: book.publisher.clone(),
        published_date: book.published_date.clone(),
        thumbnail: book.thumbnail.as_deref().map(secure_url),
        on_press: Action::OpenBook(book.id.clone()),
    }
}

fn render_details(details: &BookDetails) -> DetailsView {
    DetailsView {
        title: details.title.clone(),
        authors: author_line(&details.authors),
        page_count: details.page_count,
        language: details.language.clone(),
        published_year: details
            .published_date
            .as_deref()
            .map(|date| date.chars().take(4).collect()),
        publisher: details.publisher.clone(),
        category: details.categories.first().cloned(),
        description: details.description.clone(),
        thumbnail: details.thumbnail.as_deref().map(secure_url),
    }
}

fn author_line(authors: &[String]) -> String {
    if authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        authors.join(", ")
    }
}

/// The catalog hands out `http://` image links; hosts only load https.
fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
