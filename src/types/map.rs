use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::geo::Coordinate;

pub const ROUTE_COLOR: &str = "#007cbf";
pub const FADED_COLOR: &str = "rgba(0,0,0,0)";
pub const DASHED_COLOR: &str = "#888";
pub const POINT_RADIUS: f64 = 5.0;
pub const SOLID_LINE_WIDTH: f64 = 3.0;
pub const DASHED_LINE_WIDTH: f64 = 2.0;

pub const ROUTE_SOURCE: &str = "route";
pub const POINTS_SOURCE: &str = "points";
pub const SOLID_LAYER: &str = "route-solid";
pub const DASHED_LAYER: &str = "route-dashed";
pub const POINTS_LAYER: &str = "points";

pub const BASEMAP_STYLE: &str = "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json";
pub const INITIAL_CENTER: Coordinate = Coordinate {
    lon: -21.259719,
    lat: 63.949967,
};
pub const ZOOM: f64 = 7.0;

const PAN_DURATION_MS: u32 = 1500;
/// Horizontal position of the panned-to point, as a fraction of viewport width.
const VIRTUAL_CENTER: f64 = 0.7;
const TRIGGER_HOOK: f64 = 0.8;

const MAX_SOLID_STOP: f64 = 0.99;
const FADE_BAND: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPolicy {
    /// Interpolate between each waypoint's projected position on the route.
    #[default]
    Geometric,
    /// Spread progress evenly across waypoints, ignoring the route geometry.
    #[serde(rename = "index")]
    IndexBased,
}

impl ProgressPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "geometric" | "geo" => Some(ProgressPolicy::Geometric),
            "index" | "index_based" | "index-based" => Some(ProgressPolicy::IndexBased),
            _ => None,
        }
    }
}

/// Progress callback from one waypoint's trigger region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrollEvent {
    pub index: usize,
    pub progress: f64,
    /// `scrollTop` of the text container.
    pub scroll_offset: f64,
    #[serde(default)]
    pub viewport_width: Option<f64>,
}

/// Cutoff of the solid route line, expressed as the two inner stops of the
/// `line-gradient` expression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineGradient {
    pub solid: f64,
    pub fade: f64,
}

impl LineGradient {
    pub fn at(progress: f64) -> Self {
        let progress = progress.max(0.0);
        Self {
            solid: progress.min(MAX_SOLID_STOP),
            fade: (progress + FADE_BAND).min(1.0),
        }
    }

    /// The whole route drawn solid, as set when the layer is first added.
    pub fn full() -> Value {
        json!([
            "interpolate",
            ["linear"],
            ["line-progress"],
            0,
            ROUTE_COLOR,
            1,
            ROUTE_COLOR
        ])
    }

    pub fn expression(&self) -> Value {
        json!([
            "interpolate",
            ["linear"],
            ["line-progress"],
            0,
            ROUTE_COLOR,
            self.solid,
            ROUTE_COLOR,
            self.fade,
            FADED_COLOR
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    EaseOutQuad,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::EaseOutQuad => t * (2.0 - t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraMove {
    pub center: Coordinate,
    /// Pixel offset from the viewport center, `[x, y]`.
    pub offset: [f64; 2],
    pub zoom: f64,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl CameraMove {
    pub fn with_virtual_center(center: Coordinate, viewport_width: f64) -> Self {
        Self {
            center,
            offset: [(VIRTUAL_CENTER - 0.5) * viewport_width, 0.0],
            zoom: ZOOM,
            duration_ms: PAN_DURATION_MS,
            easing: Easing::EaseOutQuad,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineUpdate {
    pub layer: &'static str,
    pub property: &'static str,
    pub stops: LineGradient,
    pub value: Value,
}

impl LineUpdate {
    pub fn new(stops: LineGradient) -> Self {
        Self {
            layer: SOLID_LAYER,
            property: "line-gradient",
            value: stops.expression(),
            stops,
        }
    }
}

/// Rendering instructions produced for one scroll event.
#[derive(Debug, Clone, Serialize)]
pub struct ScrollOutcome {
    pub line_progress: f64,
    pub line_update: Option<LineUpdate>,
    pub pan: Option<CameraMove>,
}

/// Trigger region registration for one waypoint's text block.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSpec {
    pub index: usize,
    pub trigger_hook: f64,
    pub duration: &'static str,
}

impl SceneSpec {
    pub fn for_waypoint(index: usize) -> Self {
        Self {
            index,
            trigger_hook: TRIGGER_HOOK,
            duration: "100%",
        }
    }
}

/// Map layers added once the basemap has loaded.
pub fn layer_specs() -> Value {
    json!([
        {
            "id": POINTS_LAYER,
            "type": "circle",
            "source": POINTS_SOURCE,
            "paint": {
                "circle-radius": POINT_RADIUS,
                "circle-color": ROUTE_COLOR
            }
        },
        {
            "id": DASHED_LAYER,
            "type": "line",
            "source": ROUTE_SOURCE,
            "layout": { "line-join": "round", "line-cap": "round" },
            "paint": {
                "line-color": DASHED_COLOR,
                "line-width": DASHED_LINE_WIDTH,
                "line-dasharray": [2, 2]
            }
        },
        {
            "id": SOLID_LAYER,
            "type": "line",
            "source": ROUTE_SOURCE,
            "layout": { "line-join": "round", "line-cap": "round" },
            "paint": {
                "line-color": ROUTE_COLOR,
                "line-width": SOLID_LINE_WIDTH,
                "line-gradient": LineGradient::full()
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_stops_stay_ordered_past_the_end() {
        for p in [0.0, 0.5, 0.985, 0.99, 0.995, 1.0, 1.2] {
            let stops = LineGradient::at(p);
            assert!(stops.solid <= stops.fade, "p={p}: {stops:?}");
            assert_eq!(stops.solid, p.min(0.99));
            assert_eq!(stops.fade, (p + 0.01).min(1.0));
        }
    }

    #[test]
    fn gradient_expression_has_transparent_tail() {
        let value = LineGradient::at(0.4).expression();
        let items = value.as_array().expect("array");
        assert_eq!(items.len(), 9);
        assert_eq!(items[5].as_f64(), Some(0.4));
        assert_eq!(items[8].as_str(), Some(FADED_COLOR));
    }

    #[test]
    fn camera_offset_keeps_virtual_center_at_seventy_percent() {
        let camera = CameraMove::with_virtual_center(Coordinate::new(-21.9, 64.1), 1000.0);
        assert!((camera.offset[0] - 200.0).abs() < 1e-9);
        assert_eq!(camera.offset[1], 0.0);
        assert_eq!(camera.zoom, 7.0);
        assert_eq!(camera.duration_ms, 1500);
    }

    #[test]
    fn ease_out_quad_endpoints() {
        assert_eq!(Easing::EaseOutQuad.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOutQuad.apply(1.0), 1.0);
        assert_eq!(Easing::EaseOutQuad.apply(0.5), 0.75);
        assert_eq!(Easing::EaseOutQuad.apply(2.0), 1.0);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(ProgressPolicy::from_str("Index"), Some(ProgressPolicy::IndexBased));
        assert_eq!(ProgressPolicy::from_str("geometric"), Some(ProgressPolicy::Geometric));
        assert_eq!(ProgressPolicy::from_str("spiral"), None);
    }
}
