use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::types::map::{ScrollEvent, ScrollOutcome};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/scroll", post(scroll))
}

async fn scroll(
    State(state): State<AppState>,
    payload: Result<Json<ScrollEvent>, JsonRejection>,
) -> Result<Json<ScrollOutcome>, AppError> {
    let Json(event) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let outcome = state.driver().handle(&event)?;

    tracing::debug!(
        index = event.index,
        progress = event.progress,
        line_progress = outcome.line_progress,
        pan = outcome.pan.is_some(),
        "Scroll event handled"
    );

    Ok(Json(outcome))
}
