//! The data seam between the session and the catalog.
//!
//! `BooksRepository` is what the session talks to; tests substitute fakes
//! here. `NetworkBooksRepository` is a thin pass-through: build the request,
//! hand it to the transport, parse the response. No caching, no retry.

use async_trait::async_trait;
use tracing::info;

use crate::client::BooksClient;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{BookDetails, SearchResult};

#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// Search the catalog with one remote call. The result never holds more
    /// than `max_results` items and keeps the catalog's order. A blank query
    /// fails with `InvalidRequest` without touching the network.
    async fn search_books(&self, query: &str, max_results: u32) -> Result<SearchResult, ApiError>;

    /// Fetch full metadata for an id taken from a prior search.
    async fn fetch_book_details(&self, id: &str) -> Result<BookDetails, ApiError>;
}

/// Repository that talks to the catalog over a `Transport`.
#[derive(Debug, Clone)]
pub struct NetworkBooksRepository<T = ReqwestTransport> {
    client: BooksClient,
    transport: T,
}

impl NetworkBooksRepository<ReqwestTransport> {
    /// Repository for `base_url` using a default `reqwest` client.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(BooksClient::new(base_url), ReqwestTransport::default())
    }
}

impl<T: Transport> NetworkBooksRepository<T> {
    pub fn with_transport(client: BooksClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BooksClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> BooksRepository for NetworkBooksRepository<T> {
    async fn search_books(&self, query: &str, max_results: u32) -> Result<SearchResult, ApiError> {
        let request = self.client.build_search_books(query, max_results)?;
        let response = self.transport.execute(request).await?;
        let mut result = self.client.parse_search_books(response)?;
        result.items.truncate(max_results as usize);
        info!(query, count = result.len(), "search complete");
        Ok(result)
    }

    async fn fetch_book_details(&self, id: &str) -> Result<BookDetails, ApiError> {
        let request = self.client.build_get_book(id)?;
        let response = self.transport.execute(request).await?;
        let details = self.client.parse_get_book(response)?;
        info!(id, title = %details.title, "volume fetched");
        Ok(details)
    }
}
