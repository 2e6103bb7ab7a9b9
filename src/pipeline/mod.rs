pub mod driver;
pub mod load;
pub mod parse;
pub mod progress;
pub mod rasterize;
pub mod render;
