//! Configuration errors

use brick_core::{Color, ShapeType};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{profile}: morphology kernel size must be at least 1")]
    ZeroKernel { profile: String },

    #[error("{profile}: at least one HSV range is required")]
    NoRanges { profile: String },

    #[error("{profile}: lower bound {lower:?} exceeds upper bound {upper:?}")]
    InvertedRange {
        profile: String,
        lower: [u8; 3],
        upper: [u8; 3],
    },

    #[error("no segmentation profile for {0}")]
    MissingColor(Color),

    #[error("ROI margin must not be negative (got {0})")]
    NegativeMargin(i32),

    #[error("template threshold for {shape_type}_{color} must lie in [-1, 1] (got {value})")]
    ThresholdOutOfRange {
        color: &'static str,
        shape_type: ShapeType,
        value: f64,
    },

    #[error("classifier strategy list is empty")]
    NoStrategies,
}
