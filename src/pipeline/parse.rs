use crate::error::LoadError;
use crate::types::geo::{GeoJson, Geometry, Polyline, StoryDataset, Waypoint};

/// Splits a FeatureCollection into waypoints (Point features, in document
/// order) and the route (first LineString with at least two positions).
pub fn parse_geojson(bytes: &[u8]) -> Result<StoryDataset, LoadError> {
    let collection: GeoJson = serde_json::from_slice(bytes)?;

    let mut waypoints = Vec::new();
    let mut route: Option<Polyline> = None;
    let mut skipped = 0usize;

    for feature in collection.features() {
        match &feature.geometry {
            Some(Geometry::Point { coordinates }) => {
                waypoints.push(Waypoint {
                    index: waypoints.len(),
                    coord: *coordinates,
                    properties: feature.properties.clone().unwrap_or_default(),
                });
            }
            Some(Geometry::LineString { coordinates }) => {
                if route.is_some() {
                    tracing::warn!("Ignoring additional LineString feature");
                    continue;
                }
                match Polyline::new(coordinates.clone()) {
                    Ok(line) => route = Some(line),
                    Err(err) => tracing::warn!("Ignoring LineString feature: {}", err),
                }
            }
            Some(Geometry::Other) | None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} features without Point/LineString geometry", skipped);
    }

    Ok(StoryDataset { waypoints, route })
}
