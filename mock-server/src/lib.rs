use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const MAX_RESULTS_LIMIT: u32 = 40;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub kind: String,
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: String,
    pub thumbnail: String,
}

/// Body of a search response. The real catalog leaves `items` out entirely
/// when nothing matches, and so does this one.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeList {
    pub kind: String,
    pub total_items: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Volume>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<u32>,
}

/// Read-only in-memory catalog served by the router.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    volumes: Vec<Volume>,
    unavailable: bool,
}

impl Catalog {
    pub fn new(volumes: Vec<Volume>) -> Self {
        Self {
            volumes,
            unavailable: false,
        }
    }

    /// A catalog that answers 503 on every route.
    pub fn unavailable() -> Self {
        Self {
            volumes: Vec::new(),
            unavailable: true,
        }
    }

    /// Fixed sample data used by the binary and the tests.
    pub fn seeded() -> Self {
        Self::from_builders(vec![
            volume("jzHx01AAAAJ", "Jazz: A History of America's Music")
                .authors(&["Geoffrey C. Ward", "Ken Burns"])
                .categories(&["Music / Genres & Styles / Jazz"])
                .published("Knopf", "2000-11-07")
                .pages(489)
                .described("A companion to the documentary series.")
                .thumbnail(),
            volume("jzHx02AAAAJ", "The History of Jazz")
                .authors(&["Ted Gioia"])
                .categories(&["Music / History & Criticism"])
                .published("Oxford University Press", "2011-05-25")
                .pages(444)
                .thumbnail(),
            volume("jzHx03AAAAJ", "Kind of Blue: The Making of the Miles Davis Masterpiece")
                .authors(&["Ashley Kahn"])
                .categories(&["Music / Jazz", "Biography"])
                .published("Da Capo Press", "2001")
                .pages(224)
                .thumbnail(),
            volume("jzHx04AAAAJ", "Jazz Anecdotes")
                .authors(&["Bill Crow"])
                .categories(&["Humor"]),
            volume("rsPg01AAAAJ", "The Rust Programming Language")
                .authors(&["Steve Klabnik", "Carol Nichols"])
                .categories(&["Computers / Programming Languages"])
                .published("No Starch Press", "2019-08-12")
                .pages(561)
                .described("The official book on the Rust programming language.")
                .thumbnail(),
            volume("rsPg02AAAAJ", "Programming Rust")
                .authors(&["Jim Blandy", "Jason Orendorff", "Leonora F. S. Tindall"])
                .categories(&["Computers / Programming Languages"])
                .published("O'Reilly Media", "2021-06-11")
                .pages(735)
                .thumbnail(),
            volume("rsPg03AAAAJ", "Rust for Rustaceans")
                .authors(&["Jon Gjengset"])
                .published("No Starch Press", "2021-12-14")
                .pages(280),
            volume("hsTr01AAAAJ", "A Short History of Nearly Everything")
                .authors(&["Bill Bryson"])
                .categories(&["Science"])
                .published("Broadway Books", "2003-05-06")
                .pages(544)
                .thumbnail(),
            volume("hsTr02AAAAJ", "The Histories")
                .authors(&["Herodotus"])
                .categories(&["History / Ancient"]),
            volume("anon01AAAAJ", "Beowulf"),
        ])
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Volumes whose title, authors or categories contain every whitespace
    /// separated term of `query` (case-insensitive), in catalog order.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<Volume> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        self.volumes
            .iter()
            .filter(|v| {
                let haystack = searchable_text(&v.volume_info);
                terms.iter().all(|term| haystack.contains(term.as_str()))
            })
            .take(max_results)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.id == id)
    }
}

fn searchable_text(info: &VolumeInfo) -> String {
    let mut text = info.title.to_lowercase();
    for field in info.authors.iter().chain(&info.categories) {
        text.push(' ');
        text.push_str(&field.to_lowercase());
    }
    text
}

struct VolumeBuilder(Volume);

fn volume(id: &str, title: &str) -> VolumeBuilder {
    VolumeBuilder(Volume {
        kind: "books#volume".to_string(),
        id: id.to_string(),
        volume_info: VolumeInfo {
            title: title.to_string(),
            ..VolumeInfo::default()
        },
    })
}

impl VolumeBuilder {
    fn authors(mut self, authors: &[&str]) -> Self {
        self.0.volume_info.authors = authors.iter().map(|a| a.to_string()).collect();
        self
    }

    fn categories(mut self, categories: &[&str]) -> Self {
        self.0.volume_info.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    fn published(mut self, publisher: &str, date: &str) -> Self {
        self.0.volume_info.publisher = Some(publisher.to_string());
        self.0.volume_info.published_date = Some(date.to_string());
        self
    }

    fn pages(mut self, count: u32) -> Self {
        self.0.volume_info.page_count = Some(count);
        self.0.volume_info.language = Some("en".to_string());
        self
    }

    fn described(mut self, description: &str) -> Self {
        self.0.volume_info.description = Some(description.to_string());
        self
    }

    /// Image links in the catalog's `http://` form.
    fn thumbnail(mut self) -> Self {
        let base = format!("http://books.example.com/covers/{}", self.0.id);
        self.0.volume_info.image_links = Some(ImageLinks {
            small_thumbnail: format!("{base}-s.jpg"),
            thumbnail: format!("{base}.jpg"),
        });
        self
    }
}

impl From<VolumeBuilder> for Volume {
    fn from(builder: VolumeBuilder) -> Self {
        builder.0
    }
}

impl Catalog {
    fn from_builders(builders: Vec<VolumeBuilder>) -> Self {
        Self::new(builders.into_iter().map(Volume::from).collect())
    }
}

pub type Db = Arc<Catalog>;

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(json!({ "error": { "code": status.as_u16(), "message": message } })),
    )
}

pub fn app() -> Router {
    app_with(Catalog::seeded())
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(catalog);
    Router::new()
        .route("/books/v1/volumes", get(search_volumes))
        .route("/books/v1/volumes/{id}", get(get_volume))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Catalog::seeded()).await
}

pub async fn serve(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    info!(volumes = catalog.len(), "serving catalog");
    axum::serve(listener, app_with(catalog)).await
}

async fn search_volumes(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Result<Json<VolumeList>, Failure> {
    if db.unavailable {
        return Err(failure(StatusCode::SERVICE_UNAVAILABLE, "Backend Error"));
    }
    let query = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => return Err(failure(StatusCode::BAD_REQUEST, "Missing query.")),
    };
    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Invalid value at 'max_results'",
        ));
    }

    let items = db.search(query, max_results as usize);
    debug!(query, hits = items.len(), "search");
    Ok(Json(VolumeList {
        kind: "books#volumes".to_string(),
        total_items: items.len(),
        items,
    }))
}

async fn get_volume(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Volume>, Failure> {
    if db.unavailable {
        return Err(failure(StatusCode::SERVICE_UNAVAILABLE, "Backend Error"));
    }
    db.get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "The volume ID could not be found."))
}
