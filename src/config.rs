use std::time::Duration;

use crate::types::map::ProgressPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// File path or http(s) URL of the story's GeoJSON.
    pub story_data: String,
    pub fetch_timeout: Duration,
    pub progress_policy: ProgressPolicy,
    pub viewport_width: f64,
    pub assets_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            story_data: "assets/web/iceland.geojson".to_string(),
            fetch_timeout: Duration::from_secs(10),
            progress_policy: ProgressPolicy::Geometric,
            viewport_width: 1280.0,
            assets_dir: "assets/web".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let story_data = std::env::var("STORY_DATA")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.story_data);

        let fetch_timeout = std::env::var("FETCH_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let progress_policy = match std::env::var("PROGRESS_POLICY") {
            Ok(value) => ProgressPolicy::from_str(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown PROGRESS_POLICY {:?}, using geometric", value);
                defaults.progress_policy
            }),
            Err(_) => defaults.progress_policy,
        };

        let viewport_width = std::env::var("VIEWPORT_WIDTH")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(defaults.viewport_width);

        let assets_dir = std::env::var("ASSETS_DIR").unwrap_or(defaults.assets_dir);

        Self {
            port,
            story_data,
            fetch_timeout,
            progress_policy,
            viewport_width,
            assets_dir,
        }
    }
}
