//! Aspect-ratio heuristic

use crate::traits::{ShapeIdentifier, StrategyInput};
use crate::Result;
use brick_core::{Family, FrameReport, ShapeType, StrategyKind};
use serde::{Deserialize, Serialize};

/// Lower bounds (exclusive) on long side / short side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioThresholds {
    pub one_by_four: f64,
    pub one_by_three: f64,
    pub two_by_four: f64,
    pub two_by_two: f64,
}

impl Default for RatioThresholds {
    fn default() -> Self {
        Self {
            one_by_four: 3.19,
            one_by_three: 2.4,
            two_by_four: 1.8,
            two_by_two: 0.9,
        }
    }
}

impl RatioThresholds {
    pub fn classify(&self, family: Family, ratio: f64) -> Option<ShapeType> {
        let (larger, smaller) = match family {
            Family::Narrow => (self.one_by_four, self.one_by_three),
            Family::Wide => (self.two_by_four, self.two_by_two),
        };

        if ratio > larger {
            Some(family.larger())
        } else if ratio > smaller {
            Some(family.smaller())
        } else {
            None
        }
    }
}

pub struct AspectRatioStrategy {
    thresholds: RatioThresholds,
}

impl AspectRatioStrategy {
    pub fn new(thresholds: RatioThresholds) -> Self {
        Self { thresholds }
    }
}

impl ShapeIdentifier for AspectRatioStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AspectRatio
    }

    fn identify(&self, input: &StrategyInput<'_>, _report: &mut FrameReport) -> Result<Option<ShapeType>> {
        let Some(ratio) = input.geometry.ratio() else {
            return Ok(None);
        };
        Ok(self.thresholds.classify(input.color.family(), ratio))
    }
}
