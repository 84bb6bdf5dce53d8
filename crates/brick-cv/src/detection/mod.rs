//! High-level detection module

pub mod config;
pub mod detector;

pub use config::{DetectionConfig, SegmentationConfig, VisualizationConfig};
pub use detector::{DetectionResult, DetectionStats, ShapeDetector};
