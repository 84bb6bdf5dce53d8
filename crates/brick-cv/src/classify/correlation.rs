//! Rotation-normalised template correlation strategy

use crate::template::{TemplateMatcher, TemplateSet};
use crate::traits::{ShapeIdentifier, StrategyInput};
use crate::Result;
use brick_core::{FrameReport, ShapeType, StrategyKind};

pub struct TemplateStrategy {
    matcher: TemplateMatcher,
    templates: TemplateSet,
}

impl TemplateStrategy {
    pub fn new(matcher: TemplateMatcher, templates: TemplateSet) -> Self {
        Self { matcher, templates }
    }
}

impl ShapeIdentifier for TemplateStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TemplateCorrelation
    }

    fn identify(&self, input: &StrategyInput<'_>, report: &mut FrameReport) -> Result<Option<ShapeType>> {
        if input.geometry.size.is_none() {
            return Ok(None);
        }
        self.matcher.identify(
            input.color,
            input.region,
            input.geometry.angle,
            &self.templates,
            report,
        )
    }
}
