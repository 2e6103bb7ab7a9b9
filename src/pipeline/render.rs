use crate::error::RenderError;
use crate::pipeline::progress::haversine_distance;
use crate::types::geo::{Coordinate, StoryDataset};
use crate::types::map::{
    LineGradient, DASHED_COLOR, DASHED_LINE_WIDTH, POINT_RADIUS, ROUTE_COLOR, SOLID_LINE_WIDTH,
};

const BACKGROUND: &str = "#FAFAF8";
/// Padding around the fitted content, as a share of the shorter side.
const PADDING_RATIO: f64 = 0.08;

#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
}

/// Static rendering of the story map's three layers with the solid line
/// revealed up to `progress`.
pub fn render_svg(
    dataset: &StoryDataset,
    options: &PreviewOptions,
    progress: f64,
) -> Result<String, RenderError> {
    let width = options.width as f64;
    let height = options.height as f64;
    let padding = width.min(height) * PADDING_RATIO;
    let view_width = width - 2.0 * padding;
    let view_height = height - 2.0 * padding;
    if view_width <= 0.0 || view_height <= 0.0 {
        return Err(RenderError::SvgError("Invalid viewport size".to_string()));
    }

    let route: Vec<Coordinate> = dataset
        .route
        .as_ref()
        .map(|r| r.coords().to_vec())
        .unwrap_or_default();
    let waypoints: Vec<Coordinate> = dataset.waypoints.iter().map(|w| w.coord).collect();

    let mut layers = String::new();
    if !route.is_empty() || !waypoints.is_empty() {
        let frame = Frame::fit(
            route.iter().chain(waypoints.iter()),
            padding,
            view_width,
            view_height,
        );
        let route_xy: Vec<(f64, f64)> = route.iter().map(|c| frame.project(*c)).collect();

        if route_xy.len() >= 2 {
            let stops = LineGradient::at(progress);
            let revealed = reveal_route(&route, &route_xy, stops.solid);
            layers.push_str(&format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-dasharray="{:.1} {:.1}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                build_polyline_path(&route_xy),
                DASHED_COLOR,
                DASHED_LINE_WIDTH,
                DASHED_LINE_WIDTH * 2.0,
                DASHED_LINE_WIDTH * 2.0,
            ));
            if revealed.len() >= 2 {
                layers.push_str(&format!(
                    r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                    build_polyline_path(&revealed),
                    ROUTE_COLOR,
                    SOLID_LINE_WIDTH
                ));
            }
        }

        for coord in &waypoints {
            let (x, y) = frame.project(*coord);
            layers.push_str(&format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.1}" fill="{}"/>"#,
                x, y, POINT_RADIUS, ROUTE_COLOR
            ));
        }
    }

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
  <rect width="100%" height="100%" fill="{}"/>
  {}
</svg>"#,
        width, height, width, height, BACKGROUND, layers
    ))
}

/// Web-mercator placement of coordinates inside the padded viewport.
struct Frame {
    min_x: f64,
    max_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Frame {
    fn fit<'a>(
        coords: impl Iterator<Item = &'a Coordinate>,
        padding: f64,
        view_width: f64,
        view_height: f64,
    ) -> Self {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for coord in coords {
            let (x, y) = mercator_project(*coord);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let content_width = (max_x - min_x).max(f64::EPSILON);
        let content_height = (max_y - min_y).max(f64::EPSILON);
        let mut scale = (view_width / content_width).min(view_height / content_height);
        if !scale.is_finite() {
            scale = 1.0;
        }

        Self {
            min_x,
            max_y,
            scale,
            offset_x: padding + (view_width - content_width * scale) * 0.5,
            offset_y: padding + (view_height - content_height * scale) * 0.5,
        }
    }

    fn project(&self, coord: Coordinate) -> (f64, f64) {
        let (x, y) = mercator_project(coord);
        (
            self.offset_x + (x - self.min_x) * self.scale,
            self.offset_y + (self.max_y - y) * self.scale,
        )
    }
}

fn mercator_project(coord: Coordinate) -> (f64, f64) {
    let lat = coord.lat.clamp(-85.0, 85.0).to_radians();
    let x = coord.lon.to_radians();
    let y = (lat.tan() + (1.0 / lat.cos())).ln();
    (x, y)
}

/// Screen-space prefix of the route covering `progress` of its geographic
/// length, so the cutoff lines up with the waypoint progress values.
fn reveal_route(route: &[Coordinate], projected: &[(f64, f64)], progress: f64) -> Vec<(f64, f64)> {
    let progress = progress.clamp(0.0, 1.0);
    let segment_lengths: Vec<f64> = route
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .collect();
    let total_length: f64 = segment_lengths.iter().sum();
    if total_length <= f64::EPSILON || progress <= 0.0 {
        return Vec::new();
    }

    let target_length = total_length * progress;
    let mut traveled = 0.0;
    let mut out = vec![projected[0]];
    for (idx, segment_length) in segment_lengths.iter().copied().enumerate() {
        if segment_length <= f64::EPSILON {
            continue;
        }
        let next_traveled = traveled + segment_length;
        if next_traveled < target_length {
            out.push(projected[idx + 1]);
            traveled = next_traveled;
            continue;
        }
        let local_t = ((target_length - traveled) / segment_length).clamp(0.0, 1.0);
        out.push(lerp_point(projected[idx], projected[idx + 1], local_t));
        return out;
    }
    out
}

fn lerp_point(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

fn build_polyline_path(points: &[(f64, f64)]) -> String {
    points.iter().enumerate().fold(String::new(), |mut s, (i, (x, y))| {
        if i == 0 {
            s.push_str(&format!("M {:.2} {:.2}", x, y));
        } else {
            s.push_str(&format!(" L {:.2} {:.2}", x, y));
        }
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geo::{Polyline, Waypoint};
    use serde_json::Map;

    fn story() -> StoryDataset {
        let coords = vec![
            Coordinate::new(-21.94, 64.14),
            Coordinate::new(-20.99, 63.93),
            Coordinate::new(-19.06, 63.42),
        ];
        StoryDataset {
            waypoints: coords
                .iter()
                .enumerate()
                .map(|(index, coord)| Waypoint {
                    index,
                    coord: *coord,
                    properties: Map::new(),
                })
                .collect(),
            route: Some(Polyline::new(coords).expect("route")),
        }
    }

    const OPTIONS: PreviewOptions = PreviewOptions {
        width: 800,
        height: 600,
    };

    #[test]
    fn draws_all_layers() {
        let svg = render_svg(&story(), &OPTIONS, 0.5).expect("svg");
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(&format!("stroke=\"{}\"", ROUTE_COLOR)));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn nothing_revealed_at_start() {
        let svg = render_svg(&story(), &OPTIONS, 0.0).expect("svg");
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn empty_story_is_blank() {
        let svg = render_svg(&StoryDataset::empty(), &OPTIONS, 0.5).expect("svg");
        assert!(!svg.contains("<path"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn reveal_stops_partway() {
        let route = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 10.0)];
        let projected = [(0.0, 100.0), (0.0, 0.0)];
        let revealed = reveal_route(&route, &projected, 0.5);
        assert_eq!(revealed.len(), 2);
        assert!((revealed[1].1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_tiny_viewport() {
        let options = PreviewOptions {
            width: 0,
            height: 10,
        };
        assert!(render_svg(&story(), &options, 0.5).is_err());
    }
}
