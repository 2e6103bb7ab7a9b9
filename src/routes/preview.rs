use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::pipeline::rasterize::{self, OutputConfig};
use crate::pipeline::render::{self, PreviewOptions};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/preview", get(preview))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PreviewQuery {
    #[serde(default = "default_progress")]
    progress: f64,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

fn default_progress() -> f64 {
    1.0
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), AppError> {
    const MIN_DIM: u32 = 64;
    const MAX_DIM: u32 = 4096;

    if !(MIN_DIM..=MAX_DIM).contains(&width) || !(MIN_DIM..=MAX_DIM).contains(&height) {
        return Err(AppError::BadRequest(format!(
            "Invalid dimensions: {}x{}. Width/height must be between {} and {}",
            width, height, MIN_DIM, MAX_DIM
        )));
    }
    Ok(())
}

async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    validate_dimensions(query.width, query.height)?;
    if !query.progress.is_finite() {
        return Err(AppError::BadRequest("progress must be a number".to_string()));
    }

    let svg = render::render_svg(
        state.driver().dataset(),
        &PreviewOptions {
            width: query.width,
            height: query.height,
        },
        query.progress,
    )?;
    let png = rasterize::rasterize(
        &svg,
        &OutputConfig {
            width: query.width,
            height: query.height,
        },
    )?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
