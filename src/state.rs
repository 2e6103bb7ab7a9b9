use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::driver::{DriverSettings, ScrollProgressDriver};
use crate::types::geo::StoryDataset;

#[derive(Clone)]
pub struct AppState {
    driver: Arc<ScrollProgressDriver>,
}

impl AppState {
    pub fn new(config: &Config, dataset: StoryDataset) -> Self {
        let driver = ScrollProgressDriver::new(
            Arc::new(dataset),
            config.progress_policy,
            DriverSettings {
                viewport_width: config.viewport_width,
            },
        );
        Self {
            driver: Arc::new(driver),
        }
    }

    pub fn driver(&self) -> &ScrollProgressDriver {
        &self.driver
    }
}
