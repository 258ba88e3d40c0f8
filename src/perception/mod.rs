//! Perception module for the racer
//!
//! Turns raw sensor reads into the values the decision policy consumes:
//! sentinel-safe distances and debounced color labels.
pub mod color;
pub mod filters;
pub mod sensors;

pub use self::color::{ColorClassifier, ColorLabel, ColorSample};
pub use self::filters::ColorVote;
