mod file;
mod http;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::LoadError;
use crate::pipeline::parse;
use crate::types::geo::StoryDataset;

/// Where the story's GeoJSON comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn from_location(location: &str) -> Self {
        let lower = location.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

pub async fn load(source: &DataSource, timeout: Duration) -> Result<StoryDataset, LoadError> {
    let fetch = async {
        match source {
            DataSource::File(path) => file::read(path).await,
            DataSource::Url(url) => http::fetch(url).await,
        }
    };

    let bytes = tokio::time::timeout(timeout, fetch)
        .await
        .map_err(|_| LoadError::Timeout(timeout))??;

    parse::parse_geojson(&bytes)
}

/// Like [`load`], but any failure degrades to an empty dataset so the page
/// renders a blank map instead of failing to start.
pub async fn load_or_empty(source: &DataSource, timeout: Duration) -> StoryDataset {
    match load(source, timeout).await {
        Ok(dataset) => dataset,
        Err(err) => {
            tracing::error!("Error loading GeoJSON from {:?}: {}", source, err);
            StoryDataset::empty()
        }
    }
}
