//! Client core for a book-catalog browser.
//!
//! # Overview
//! Searches a public book catalog, fetches details for a selected volume, and
//! publishes an observable view state that a native host renders.
//!
//! # Design
//! - `BooksClient` is sans-IO: `build_*` produces an `HttpRequest`, `parse_*`
//!   consumes an `HttpResponse`. A `Transport` performs the round-trip.
//! - `BooksRepository` is the seam between the session and the catalog;
//!   tests plug fakes in here.
//! - `Session` owns the single `ViewState` in a `watch` channel and spawns one
//!   task per fetch. Errors collapse into `Response::Error` at that boundary.
//! - `view::render` is a pure function from state to a serializable UI tree.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod repository;
pub mod response;
pub mod session;
pub mod state;
pub mod transport;
pub mod types;
pub mod view;

pub use client::BooksClient;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use repository::{BooksRepository, NetworkBooksRepository};
pub use response::Response;
pub use session::Session;
pub use state::{Screen, TopBarMode, ViewState};
pub use transport::{ReqwestTransport, Transport};
pub use types::{BookDetails, BookSummary, SearchResult};
pub use view::{render, Action, Frame, Layout};
