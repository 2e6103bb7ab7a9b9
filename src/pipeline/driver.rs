use std::sync::Arc;

use crate::error::DriverError;
use crate::pipeline::progress;
use crate::types::geo::StoryDataset;
use crate::types::map::{
    CameraMove, LineGradient, LineUpdate, ProgressPolicy, SceneSpec, ScrollEvent, ScrollOutcome,
};

/// Progress shown while the text container hasn't been scrolled yet.
const AT_TOP_PROGRESS: f64 = 0.001;
const PAN_WINDOW: (f64, f64) = (0.1, 0.9);

#[derive(Debug, Clone, Copy)]
pub struct DriverSettings {
    /// Used for the pan offset when an event doesn't report its own width.
    pub viewport_width: f64,
}

/// Turns scroll events into line and camera instructions for one story.
pub struct ScrollProgressDriver {
    dataset: Arc<StoryDataset>,
    policy: ProgressPolicy,
    settings: DriverSettings,
    waypoint_progress: Vec<f64>,
}

impl ScrollProgressDriver {
    pub fn new(dataset: Arc<StoryDataset>, policy: ProgressPolicy, settings: DriverSettings) -> Self {
        let waypoint_progress = match policy {
            ProgressPolicy::Geometric => progress::waypoint_progress(&dataset),
            ProgressPolicy::IndexBased => Vec::new(),
        };

        Self {
            dataset,
            policy,
            settings,
            waypoint_progress,
        }
    }

    pub fn policy(&self) -> ProgressPolicy {
        self.policy
    }

    pub fn dataset(&self) -> &StoryDataset {
        &self.dataset
    }

    /// Precomputed route progress per waypoint; empty under the index policy.
    pub fn waypoint_progress(&self) -> &[f64] {
        &self.waypoint_progress
    }

    pub fn scenes(&self) -> Vec<SceneSpec> {
        (0..self.dataset.waypoints.len())
            .map(SceneSpec::for_waypoint)
            .collect()
    }

    pub fn handle(&self, event: &ScrollEvent) -> Result<ScrollOutcome, DriverError> {
        if !event.progress.is_finite() || !(0.0..=1.0).contains(&event.progress) {
            return Err(DriverError::InvalidProgress(event.progress));
        }

        let count = self.dataset.waypoints.len();
        let waypoint = self
            .dataset
            .waypoints
            .get(event.index)
            .ok_or(DriverError::UnknownWaypoint {
                index: event.index,
                count,
            })?;

        let line_progress = self.line_progress(event, count);

        let line_update = self
            .dataset
            .route
            .as_ref()
            .map(|_| LineUpdate::new(LineGradient::at(line_progress)));

        let pan = if event.progress > PAN_WINDOW.0 && event.progress < PAN_WINDOW.1 {
            let width = event
                .viewport_width
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(self.settings.viewport_width);
            Some(CameraMove::with_virtual_center(waypoint.coord, width))
        } else {
            None
        };

        Ok(ScrollOutcome {
            line_progress,
            line_update,
            pan,
        })
    }

    fn line_progress(&self, event: &ScrollEvent, count: usize) -> f64 {
        match self.policy {
            ProgressPolicy::Geometric => {
                let current = self.waypoint_progress[event.index];
                let previous = event
                    .index
                    .checked_sub(1)
                    .map(|prev| self.waypoint_progress[prev])
                    .unwrap_or(0.0);
                previous + (current - previous) * event.progress
            }
            ProgressPolicy::IndexBased => {
                if event.scroll_offset == 0.0 {
                    AT_TOP_PROGRESS
                } else {
                    (event.index as f64 + event.progress) / count as f64
                }
            }
        }
    }
}
