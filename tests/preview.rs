use axum::{body::to_bytes, http::Request, Router};
use storymap_rs::{
    config::Config, pipeline::parse::parse_geojson, state::AppState, types::geo::StoryDataset,
};
use tower::ServiceExt;

fn app(dataset: StoryDataset) -> Router {
    storymap_rs::api_router().with_state(AppState::new(&Config::default(), dataset))
}

fn story() -> StoryDataset {
    parse_geojson(
        br#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [-21.94, 64.14]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [-19.0, 63.42]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[-21.94, 64.14], [-20.3, 63.95], [-19.0, 63.42]]}}
        ]}"#,
    )
    .expect("dataset")
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .method("GET")
            .body(axum::body::Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

#[tokio::test]
async fn preview_returns_png() {
    let response = get(app(story()), "/api/preview?progress=0.4&width=320&height=240").await;

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert_eq!(content_type, "image/png");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    assert!(body.len() > 100);
}

#[tokio::test]
async fn preview_of_empty_story_still_renders() {
    let response = get(app(StoryDataset::empty()), "/api/preview?width=128&height=128").await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}

#[tokio::test]
async fn preview_rejects_oversized_dimensions() {
    let response = get(app(story()), "/api/preview?width=10000&height=200").await;
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}
