use mimalloc::MiMalloc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storymap_rs::config::Config;
use storymap_rs::pipeline::load::{self, DataSource};
use storymap_rs::state::AppState;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storymap_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let source = DataSource::from_location(&config.story_data);
    let dataset = load::load_or_empty(&source, config.fetch_timeout).await;
    tracing::info!(
        "Loaded story from {}: {} waypoints, route {}",
        config.story_data,
        dataset.waypoints.len(),
        if dataset.route.is_some() { "present" } else { "missing" }
    );

    let state = AppState::new(&config, dataset);

    let app = storymap_rs::router(&config.assets_dir)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("StoryMap-RS listening on {}", addr);
    tracing::info!("Story: GET http://{}/api/story", addr);
    tracing::info!("Scroll: POST http://{}/api/scroll", addr);
    tracing::info!("Preview: GET http://{}/api/preview?progress=0.5", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
