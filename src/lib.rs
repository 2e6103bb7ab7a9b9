pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

use axum::Router;
use tower_http::services::ServeDir;

/// API routes without static file serving or middleware.
pub fn api_router() -> Router<state::AppState> {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::story::router())
        .merge(routes::scroll::router())
        .merge(routes::preview::router())
}

/// API routes with everything else served from `assets_dir`.
pub fn router(assets_dir: &str) -> Router<state::AppState> {
    api_router().fallback_service(ServeDir::new(assets_dir))
}
