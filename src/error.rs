use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(#[from] serde_json::Error),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProgressError {
    #[error("Insufficient route points (need at least 2, got {0})")]
    InsufficientPoints(usize),
    #[error("Route has zero total length")]
    DegenerateRoute,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DriverError {
    #[error("No waypoint at index {index} ({count} waypoints loaded)")]
    UnknownWaypoint { index: usize, count: usize },
    #[error("Scroll progress must be within [0, 1], got {0}")]
    InvalidProgress(f64),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("SVG generation failed: {0}")]
    SvgError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("PNG rendering failed: {0}")]
    RenderFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Driver(DriverError::UnknownWaypoint { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Driver(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Render(_) | AppError::Raster(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
