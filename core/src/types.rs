//! Wire DTOs for the catalog API and the flat records built from them.
//!
//! # Design
//! The `Volume*` types mirror the catalog JSON and are as lenient as the
//! catalog is inconsistent: only the volume `id` and `volumeInfo.title` are
//! required, every other field defaults to empty or absent, and unknown
//! fields are ignored. `items` itself is omitted by the catalog when a query
//! has no matches.
//!
//! `BookSummary` and `BookDetails` are the flat records the rest of the crate
//! works with. They are defined independently of the mock-server crate;
//! integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Body of `GET /books/v1/volumes`.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeList {
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// A single volume as returned by either endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ImageLinks {
    /// The regular thumbnail, falling back to the small one.
    fn best(self) -> Option<String> {
        self.thumbnail.or(self.small_thumbnail)
    }
}

/// One entry of a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl From<Volume> for BookSummary {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        Self {
            id: volume.id,
            title: info.title,
            authors: info.authors,
            publisher: info.publisher,
            published_date: info.published_date,
            thumbnail: info.image_links.and_then(ImageLinks::best),
        }
    }
}

/// Full metadata for a single volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

impl From<Volume> for BookDetails {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        Self {
            id: volume.id,
            title: info.title,
            authors: info.authors,
            categories: info.categories,
            publisher: info.publisher,
            published_date: info.published_date,
            thumbnail: info.image_links.and_then(ImageLinks::best),
            description: info.description,
            language: info.language,
            page_count: info.page_count,
        }
    }
}

/// Search hits in the order the catalog returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<BookSummary>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BookSummary> {
        self.items.iter().find(|book| book.id == id)
    }
}

impl From<VolumeList> for SearchResult {
    fn from(list: VolumeList) -> Self {
        Self {
            items: list.items.into_iter().map(BookSummary::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_with_only_required_fields_decodes() {
        let json = r#"{"id":"abc","volumeInfo":{"title":"Bare"}}"#;
        let volume: Volume = serde_json::from_str(json).unwrap();
        let details = BookDetails::from(volume);
        assert_eq!(details.id, "abc");
        assert_eq!(details.title, "Bare");
        assert!(details.authors.is_empty());
        assert!(details.categories.is_empty());
        assert!(details.thumbnail.is_none());
        assert!(details.page_count.is_none());
    }

    #[test]
    fn missing_title_is_rejected() {
        let json = r#"{"id":"abc","volumeInfo":{"authors":["A"]}}"#;
        assert!(serde_json::from_str::<Volume>(json).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "kind": "books#volume",
            "id": "x1",
            "etag": "zzz",
            "volumeInfo": {"title": "T", "printType": "BOOK", "maturityRating": "NOT_MATURE"},
            "saleInfo": {"country": "US"}
        }"#;
        let summary = BookSummary::from(serde_json::from_str::<Volume>(json).unwrap());
        assert_eq!(summary.id, "x1");
        assert_eq!(summary.title, "T");
    }

    #[test]
    fn list_without_items_is_empty() {
        let list: VolumeList =
            serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
        assert!(SearchResult::from(list).is_empty());
    }

    #[test]
    fn thumbnail_falls_back_to_small_thumbnail() {
        let json = r#"{"id":"a","volumeInfo":{"title":"T","imageLinks":{"smallThumbnail":"http://img/s"}}}"#;
        let summary = BookSummary::from(serde_json::from_str::<Volume>(json).unwrap());
        assert_eq!(summary.thumbnail.as_deref(), Some("http://img/s"));
    }

    #[test]
    fn image_links_without_thumbnail_yield_none() {
        let json = r#"{"id":"a","volumeInfo":{"title":"T","imageLinks":{}}}"#;
        let summary = BookSummary::from(serde_json::from_str::<Volume>(json).unwrap());
        assert!(summary.thumbnail.is_none());
    }

    #[test]
    fn search_result_keeps_response_order() {
        let json = r#"{"items":[
            {"id":"b","volumeInfo":{"title":"Second"}},
            {"id":"a","volumeInfo":{"title":"First"}}
        ]}"#;
        let result = SearchResult::from(serde_json::from_str::<VolumeList>(json).unwrap());
        let ids: Vec<&str> = result.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(result.get("a").map(|b| b.title.as_str()), Some("First"));
    }
}
