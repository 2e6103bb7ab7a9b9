pub mod health;
pub mod preview;
pub mod scroll;
pub mod story;
