use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProgressError;

/// Longitude/latitude pair in degrees, serialized as a GeoJSON position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = String;

    // Positions may carry a third (altitude) member, which is dropped.
    fn try_from(position: Vec<f64>) -> Result<Self, Self::Error> {
        match position.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!(
                "position needs at least 2 members, got {}",
                position.len()
            )),
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

/// Ordered route geometry with at least two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    coords: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(coords: Vec<Coordinate>) -> Result<Self, ProgressError> {
        if coords.len() < 2 {
            return Err(ProgressError::InsufficientPoints(coords.len()));
        }
        Ok(Self { coords })
    }

    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub index: usize,
    pub coord: Coordinate,
    pub properties: Map<String, Value>,
}

/// Points and route loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryDataset {
    pub waypoints: Vec<Waypoint>,
    pub route: Option<Polyline>,
}

impl StoryDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty() && self.route.is_none()
    }
}

// Minimal GeoJSON shapes. Unknown geometry types deserialize to `Other` so a
// polygon in the collection doesn't reject the whole file.

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    FeatureCollection {
        #[serde(default)]
        features: Vec<Feature>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Coordinate },
    LineString { coordinates: Vec<Coordinate> },
    #[serde(other)]
    Other,
}

impl GeoJson {
    pub fn features(&self) -> &[Feature] {
        match self {
            GeoJson::FeatureCollection { features } => features,
        }
    }
}
