use crate::error::ProgressError;
use crate::types::geo::{Coordinate, Polyline, StoryDataset};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fraction of the route's length at which `point`'s nearest projection lies.
///
/// Segments are scanned in order and only a strictly closer projection
/// replaces the current best, so exact ties resolve to the earlier segment.
pub fn compute_progress(route: &Polyline, point: Coordinate) -> Result<f64, ProgressError> {
    let coords = route.coords();
    if coords.len() < 2 {
        return Err(ProgressError::InsufficientPoints(coords.len()));
    }

    let total_length = route_length_km(route);
    if total_length <= f64::EPSILON {
        return Err(ProgressError::DegenerateRoute);
    }

    let mut min_distance = f64::INFINITY;
    let mut progress_at_min = 0.0;
    let mut accumulated = 0.0;

    for pair in coords.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let segment_length = haversine_distance(start, end);
        let projected = project_onto_segment(start, end, point);
        let distance = haversine_distance(point, projected);

        if distance < min_distance {
            min_distance = distance;
            let along = haversine_distance(start, projected).min(segment_length);
            progress_at_min = (accumulated + along) / total_length;
        }

        accumulated += segment_length;
    }

    Ok(progress_at_min.clamp(0.0, 1.0))
}

/// Progress of every waypoint along the route, in waypoint order.
///
/// Without a usable route every waypoint sits at 0.
pub fn waypoint_progress(dataset: &StoryDataset) -> Vec<f64> {
    let Some(route) = dataset.route.as_ref() else {
        return vec![0.0; dataset.waypoints.len()];
    };

    dataset
        .waypoints
        .iter()
        .map(|waypoint| match compute_progress(route, waypoint.coord) {
            Ok(progress) => progress,
            Err(err) => {
                tracing::warn!("Waypoint {} falls back to 0: {}", waypoint.index, err);
                0.0
            }
        })
        .collect()
}

pub fn route_length_km(route: &Polyline) -> f64 {
    route
        .coords()
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Nearest point on the segment (not the infinite line), found in a local
/// equirectangular plane. Zero-length segments project onto their start.
fn project_onto_segment(start: Coordinate, end: Coordinate, point: Coordinate) -> Coordinate {
    let k = ((start.lat + end.lat) / 2.0).to_radians().cos();

    let dx = (end.lon - start.lon) * k;
    let dy = end.lat - start.lat;
    let len2 = dx * dx + dy * dy;
    if len2 <= f64::EPSILON * f64::EPSILON {
        return start;
    }

    let px = (point.lon - start.lon) * k;
    let py = point.lat - start.lat;
    let t = ((px * dx + py * dy) / len2).clamp(0.0, 1.0);

    Coordinate::new(
        start.lon + (end.lon - start.lon) * t,
        start.lat + (end.lat - start.lat) * t,
    )
}

pub(crate) fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
