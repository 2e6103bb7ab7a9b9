use axum::{body::to_bytes, http::Request, Router};
use serde_json::Value;
use storymap_rs::{
    config::Config,
    pipeline::load::{load_or_empty, DataSource},
    state::AppState,
    types::geo::StoryDataset,
};
use tower::ServiceExt;

fn app(dataset: StoryDataset) -> Router {
    storymap_rs::api_router().with_state(AppState::new(&Config::default(), dataset))
}

async fn get_story(app: Router) -> Value {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/story")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn bundled_story_exposes_sources_layers_and_scenes() {
    let source = DataSource::File(
        concat!(env!("CARGO_MANIFEST_DIR"), "/assets/web/iceland.geojson").into(),
    );
    let dataset = load_or_empty(&source, std::time::Duration::from_secs(5)).await;
    let json = get_story(app(dataset)).await;

    assert_eq!(json["policy"].as_str(), Some("geometric"));
    assert!(json["route_length_km"].as_f64().unwrap_or(0.0) > 0.0);
    assert_eq!(json["sources"]["route"]["type"].as_str(), Some("geojson"));
    assert_eq!(json["sources"]["route"]["lineMetrics"].as_bool(), Some(true));
    assert_eq!(
        json["sources"]["route"]["data"]["features"]
            .as_array()
            .map(Vec::len),
        Some(1)
    );

    let scenes = json["scenes"].as_array().expect("scenes");
    let points = json["sources"]["points"]["data"]["features"]
        .as_array()
        .expect("points");
    assert_eq!(scenes.len(), points.len());
    assert_eq!(scenes[0]["trigger_hook"].as_f64(), Some(0.8));

    let progress: Vec<f64> = json["waypoint_progress"]
        .as_array()
        .expect("progress")
        .iter()
        .filter_map(Value::as_f64)
        .collect();
    assert_eq!(progress.len(), points.len());
    assert_eq!(progress[0], 0.0);
    assert!((progress[progress.len() - 1] - 1.0).abs() < 1e-9);
    assert!(progress.windows(2).all(|pair| pair[1] >= pair[0]));

    let layer_ids: Vec<&str> = json["layers"]
        .as_array()
        .expect("layers")
        .iter()
        .filter_map(|layer| layer["id"].as_str())
        .collect();
    assert_eq!(layer_ids, vec!["points", "route-dashed", "route-solid"]);
}

#[tokio::test]
async fn failed_load_serves_empty_story() {
    let source = DataSource::File("no/such/story.geojson".into());
    let dataset = load_or_empty(&source, std::time::Duration::from_secs(1)).await;
    let json = get_story(app(dataset)).await;

    assert_eq!(json["scenes"].as_array().map(Vec::len), Some(0));
    assert_eq!(
        json["sources"]["points"]["data"]["features"]
            .as_array()
            .map(Vec::len),
        Some(0)
    );
    assert!(json["route_length_km"].is_null());
}
