use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::pipeline::progress;
use crate::state::AppState;
use crate::types::geo::{Coordinate, StoryDataset};
use crate::types::map::{
    layer_specs, ProgressPolicy, SceneSpec, BASEMAP_STYLE, INITIAL_CENTER, POINTS_SOURCE,
    ROUTE_SOURCE, ZOOM,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/story", get(story))
}

#[derive(Serialize)]
struct InitialView {
    style: &'static str,
    center: Coordinate,
    zoom: f64,
}

#[derive(Serialize)]
struct StoryResponse {
    policy: ProgressPolicy,
    initial_view: InitialView,
    sources: Value,
    layers: Value,
    scenes: Vec<SceneSpec>,
    waypoint_progress: Vec<f64>,
    route_length_km: Option<f64>,
}

/// Everything the page needs to add its map sources, layers and scroll scenes.
async fn story(State(state): State<AppState>) -> Json<StoryResponse> {
    let driver = state.driver();
    let dataset = driver.dataset();

    Json(StoryResponse {
        policy: driver.policy(),
        initial_view: InitialView {
            style: BASEMAP_STYLE,
            center: INITIAL_CENTER,
            zoom: ZOOM,
        },
        sources: json!({
            ROUTE_SOURCE: {
                "type": "geojson",
                "data": route_collection(dataset),
                "lineMetrics": true
            },
            POINTS_SOURCE: {
                "type": "geojson",
                "data": points_collection(dataset)
            }
        }),
        layers: layer_specs(),
        scenes: driver.scenes(),
        waypoint_progress: driver.waypoint_progress().to_vec(),
        route_length_km: dataset.route.as_ref().map(progress::route_length_km),
    })
}

fn points_collection(dataset: &StoryDataset) -> Value {
    let features: Vec<Value> = dataset
        .waypoints
        .iter()
        .map(|waypoint| {
            json!({
                "type": "Feature",
                "properties": waypoint.properties,
                "geometry": { "type": "Point", "coordinates": waypoint.coord }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

fn route_collection(dataset: &StoryDataset) -> Value {
    let features: Vec<Value> = dataset
        .route
        .iter()
        .map(|route| {
            json!({
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": route.coords() }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}
