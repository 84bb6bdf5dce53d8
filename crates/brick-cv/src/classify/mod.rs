//! Shape classification: an ordered list of strategies with fallback

pub mod classifier;
pub mod correlation;
pub mod ratio;

pub use classifier::ShapeClassifier;
pub use correlation::TemplateStrategy;
pub use ratio::{AspectRatioStrategy, RatioThresholds};

use crate::error::ConfigError;
use crate::geometry::MinBoundingBox;
use brick_core::{ShapeType, StrategyKind};
use serde::{Deserialize, Serialize};

/// Which strategies run, in which order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub strategies: Vec<StrategyKind>,
    pub ratio: RatioThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyKind::TemplateCorrelation, StrategyKind::AspectRatio],
            ratio: RatioThresholds::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        Ok(())
    }
}

/// Outcome for one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub shape_type: ShapeType,
    /// Present whenever geometry was found
    pub angle: Option<f64>,
    /// Strategy that produced the type, `None` when undefined
    pub strategy: Option<StrategyKind>,
    pub geometry: Option<MinBoundingBox>,
}

impl Classification {
    pub fn undefined(geometry: Option<MinBoundingBox>) -> Self {
        Self {
            shape_type: ShapeType::Undefined,
            angle: geometry.map(|g| g.angle),
            strategy: None,
            geometry,
        }
    }
}
