use axum::{http::Request, Router};
use storymap_rs::{config::Config, state::AppState, types::geo::StoryDataset};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(&Config::default(), StoryDataset::empty());
    storymap_rs::router(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/web")).with_state(state)
}

async fn status_of(uri: &str) -> axum::http::StatusCode {
    app()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
        .status()
}

#[tokio::test]
async fn serves_bundled_story_file() {
    assert_eq!(status_of("/iceland.geojson").await, axum::http::StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    assert_eq!(status_of("/no/such/page").await, axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_routes_win_over_static_files() {
    assert_eq!(status_of("/health").await, axum::http::StatusCode::OK);
}
