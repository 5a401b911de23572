use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Catalog, Volume, VolumeInfo, VolumeList};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn numbered_catalog(count: usize) -> Catalog {
    Catalog::new(
        (0..count)
            .map(|i| Volume {
                kind: "books#volume".to_string(),
                id: i.to_string(),
                volume_info: VolumeInfo {
                    title: format!("Jazz History Vol. {i}"),
                    ..VolumeInfo::default()
                },
            })
            .collect(),
    )
}

// --- search ---

#[tokio::test]
async fn search_returns_matches_in_catalog_order() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=jazz+history&maxResults=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: VolumeList = body_json(resp).await;
    let ids: Vec<&str> = list.items.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["jzHx01AAAAJ", "jzHx02AAAAJ"]);
    assert_eq!(list.total_items, 2);
}

#[tokio::test]
async fn search_caps_at_max_results() {
    let resp = app_with(numbered_catalog(15))
        .oneshot(get("/books/v1/volumes?q=jazz&maxResults=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: VolumeList = body_json(resp).await;
    assert_eq!(list.items.len(), 10);
    assert_eq!(list.items[9].id, "9");
}

#[tokio::test]
async fn search_defaults_to_ten_results() {
    let resp = app_with(numbered_catalog(15))
        .oneshot(get("/books/v1/volumes?q=jazz"))
        .await
        .unwrap();

    let list: VolumeList = body_json(resp).await;
    assert_eq!(list.items.len(), 10);
}

#[tokio::test]
async fn search_without_matches_omits_items() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=zzzzzz"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["totalItems"], 0);
    assert!(body.get("items").is_none());
}

#[tokio::test]
async fn search_missing_query_returns_400() {
    let resp = app().oneshot(get("/books/v1/volumes")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);
}

#[tokio::test]
async fn search_blank_query_returns_400() {
    let resp = app().oneshot(get("/books/v1/volumes?q=+++")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_out_of_range_limit_returns_400() {
    for uri in [
        "/books/v1/volumes?q=rust&maxResults=0",
        "/books/v1/volumes?q=rust&maxResults=41",
        "/books/v1/volumes?q=rust&maxResults=many",
    ] {
        let resp = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

// --- get ---

#[tokio::test]
async fn get_volume_returns_full_metadata() {
    let resp = app()
        .oneshot(get("/books/v1/volumes/rsPg01AAAAJ"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let volume: Volume = body_json(resp).await;
    assert_eq!(volume.id, "rsPg01AAAAJ");
    assert_eq!(volume.volume_info.title, "The Rust Programming Language");
    assert_eq!(volume.volume_info.page_count, Some(561));
    assert!(volume.volume_info.description.is_some());
}

#[tokio::test]
async fn get_volume_not_found() {
    let resp = app()
        .oneshot(get("/books/v1/volumes/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_volume_decodes_percent_encoded_id() {
    let catalog = Catalog::new(vec![Volume {
        kind: "books#volume".to_string(),
        id: "a b".to_string(),
        volume_info: VolumeInfo {
            title: "Spaced".to_string(),
            ..VolumeInfo::default()
        },
    }]);
    let resp = app_with(catalog)
        .oneshot(get("/books/v1/volumes/a%20b"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let volume: Volume = body_json(resp).await;
    assert_eq!(volume.volume_info.title, "Spaced");
}

// --- unavailable catalog ---

#[tokio::test]
async fn unavailable_catalog_fails_every_route() {
    for uri in ["/books/v1/volumes?q=rust", "/books/v1/volumes/rsPg01AAAAJ"] {
        let resp = app_with(Catalog::unavailable()).oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        let body = body_bytes(resp).await;
        assert!(!body.is_empty());
    }
}

// --- search then open ---

#[tokio::test]
async fn search_then_open_first_hit() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/books/v1/volumes?q=rust&maxResults=3"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: VolumeList = body_json(resp).await;
    assert_eq!(list.items.len(), 3);
    let first = &list.items[0];

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/books/v1/volumes/{}", first.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let volume: Volume = body_json(resp).await;
    assert_eq!(volume.id, first.id);
    assert_eq!(volume.volume_info.title, first.volume_info.title);
}
