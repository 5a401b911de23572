//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `BooksClient` holds only a `base_url` and carries no mutable state between
//! calls. Each remote operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the client
//! deterministic and free of I/O.

use reqwest::Url;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{BookDetails, SearchResult, Volume, VolumeList};

/// Public catalog service used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Largest `maxResults` the catalog accepts.
pub const MAX_RESULTS_LIMIT: u32 = 40;

const VOLUMES_PATH: &str = "books/v1/volumes";

/// Synchronous, stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct BooksClient {
    base_url: String,
}

impl Default for BooksClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BooksClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/books/v1/volumes?q={query}&maxResults={max_results}`.
    ///
    /// A blank query or an out-of-range `max_results` is rejected with
    /// `InvalidRequest` here, so no request is ever sent for it. Callers see
    /// the same failure they would get from the catalog's 400.
    pub fn build_search_books(&self, query: &str, max_results: u32) -> Result<HttpRequest, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::InvalidRequest("search query is blank".to_string()));
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(ApiError::InvalidRequest(format!(
                "maxResults must be within 1..={MAX_RESULTS_LIMIT}, got {max_results}"
            )));
        }
        let mut url = self.volumes_url()?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxResults", &max_results.to_string());
        debug!(%url, "built search request");
        Ok(get(url))
    }

    /// `GET {base}/books/v1/volumes/{id}`, with `id` encoded as one path segment.
    pub fn build_get_book(&self, id: &str) -> Result<HttpRequest, ApiError> {
        if id.is_empty() {
            return Err(ApiError::InvalidRequest("volume id is empty".to_string()));
        }
        let mut url = self.volumes_url()?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidRequest(format!("base url cannot hold a path: {}", self.base_url)))?
            .push(id);
        debug!(%url, "built volume request");
        Ok(get(url))
    }

    pub fn parse_search_books(&self, response: HttpResponse) -> Result<SearchResult, ApiError> {
        check_status(&response)?;
        let list: VolumeList =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(list.into())
    }

    pub fn parse_get_book(&self, response: HttpResponse) -> Result<BookDetails, ApiError> {
        check_status(&response)?;
        let volume: Volume =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(volume.into())
    }

    fn volumes_url(&self) -> Result<Url, ApiError> {
        let raw = format!("{}/{VOLUMES_PATH}", self.base_url);
        Url::parse(&raw).map_err(|e| ApiError::InvalidRequest(format!("invalid base url {}: {e}", self.base_url)))
    }
}

fn get(url: Url) -> HttpRequest {
    HttpRequest {
        url: url.into(),
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}
