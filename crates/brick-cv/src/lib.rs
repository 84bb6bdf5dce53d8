//! Brick Computer Vision Library
//!
//! Colour segmentation, region extraction, geometric normalisation and shape
//! classification of brick-like regions using OpenCV.

pub mod classify;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod regions;
pub mod roi;
pub mod segmentation;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use classify::{Classification, ShapeClassifier};
pub use detection::{DetectionConfig, DetectionResult, ShapeDetector};
pub use error::ConfigError;
pub use geometry::{GeometryNormalizer, MinBoundingBox};
pub use segmentation::{ColorSegmenter, HsvRange, Segmentation};
pub use template::{TemplateLoader, TemplateMatcher, TemplateSet};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;
    use brick_core::{Color, FrameReport, ShapeType, StrategyKind};
    use opencv::core::Mat;

    /// Everything a strategy may look at for one shape
    pub struct StrategyInput<'a> {
        pub color: Color,
        /// Re-cut image region around the shape
        pub region: &'a Mat,
        pub geometry: &'a MinBoundingBox,
    }

    /// One way of turning a shape's region into a type
    pub trait ShapeIdentifier {
        fn kind(&self) -> StrategyKind;

        /// `Ok(None)` means this strategy could not decide
        fn identify(&self, input: &StrategyInput<'_>, report: &mut FrameReport)
            -> Result<Option<ShapeType>>;
    }

    /// Trait for template matching implementations
    pub trait TemplateMatchable {
        /// Peak similarity of `template` anywhere inside `image`, higher is better
        fn peak_score(&self, image: &Mat, template: &Mat) -> Result<f64>;
    }
}
