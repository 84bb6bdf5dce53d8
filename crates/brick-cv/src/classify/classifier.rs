//! Strategy-list shape classifier

use super::{AspectRatioStrategy, Classification, ClassifierConfig, TemplateStrategy};
use crate::geometry::GeometryNormalizer;
use crate::template::{TemplateConfig, TemplateMatcher, TemplateSet};
use crate::traits::{ShapeIdentifier, StrategyInput};
use crate::Result;
use brick_core::{Color, FrameEvent, FrameReport, StrategyKind};
use log::{debug, warn};
use opencv::core::Mat;

/// Assigns a shape type to one region using the first strategy that decides
pub struct ShapeClassifier {
    normalizer: GeometryNormalizer,
    strategies: Vec<Box<dyn ShapeIdentifier>>,
}

impl ShapeClassifier {
    /// Build the configured strategy list; a kind listed twice runs once
    pub fn new(
        config: &ClassifierConfig,
        normalizer: GeometryNormalizer,
        template_config: &TemplateConfig,
        templates: TemplateSet,
    ) -> Self {
        let mut templates = Some(templates);
        let mut strategies: Vec<Box<dyn ShapeIdentifier>> = Vec::new();

        for kind in &config.strategies {
            if strategies.iter().any(|s| s.kind() == *kind) {
                warn!("Strategy {} listed more than once, ignoring repeat", kind);
                continue;
            }
            match kind {
                StrategyKind::TemplateCorrelation => strategies.push(Box::new(TemplateStrategy::new(
                    TemplateMatcher::from_config(template_config),
                    templates.take().unwrap_or_default(),
                ))),
                StrategyKind::AspectRatio => {
                    strategies.push(Box::new(AspectRatioStrategy::new(config.ratio)))
                }
            }
        }

        Self::with_strategies(normalizer, strategies)
    }

    pub fn with_strategies(normalizer: GeometryNormalizer, strategies: Vec<Box<dyn ShapeIdentifier>>) -> Self {
        Self {
            normalizer,
            strategies,
        }
    }

    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Classify shape `index` of `color`.
    ///
    /// `region_image` and `region_mask` are the same margin re-cut of the
    /// frame and of the colour mask.
    pub fn classify(
        &self,
        index: usize,
        color: Color,
        region_image: &Mat,
        region_mask: &Mat,
        report: &mut FrameReport,
    ) -> Result<Classification> {
        let Some(geometry) = self.normalizer.for_typing(region_mask)? else {
            debug!("#{} {}: no contour above typing floor", index, color);
            report.push(FrameEvent::GeometryUnavailable { index, color });
            return Ok(Classification::undefined(None));
        };

        if geometry.size.is_none() {
            report.push(FrameEvent::DegenerateBox { index, color });
            return Ok(Classification::undefined(Some(geometry)));
        }

        let input = StrategyInput {
            color,
            region: region_image,
            geometry: &geometry,
        };

        for strategy in &self.strategies {
            if let Some(shape_type) = strategy.identify(&input, report)? {
                debug!("#{} {}: {} via {}", index, color, shape_type, strategy.kind());
                return Ok(Classification {
                    shape_type,
                    angle: Some(geometry.angle),
                    strategy: Some(strategy.kind()),
                    geometry: Some(geometry),
                });
            }
        }

        Ok(Classification::undefined(Some(geometry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{MatchingMethod, Template};
    use brick_core::ShapeType;
    use opencv::{
        core::{Rect, Scalar, CV_8UC1},
        imgproc,
    };
    use std::collections::BTreeMap;

    fn canvas(rows: i32, cols: i32) -> Result<Mat> {
        Ok(Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?)
    }

    fn fill(image: &mut Mat, rect: Rect) -> Result<()> {
        imgproc::rectangle(image, rect, Scalar::all(255.0), imgproc::FILLED, imgproc::LINE_8, 0)?;
        Ok(())
    }

    fn bar_mask() -> Result<Mat> {
        let mut mask = canvas(220, 120)?;
        fill(&mut mask, Rect::new(40, 30, 40, 160))?;
        Ok(mask)
    }

    fn default_classifier(templates: TemplateSet, template_config: &TemplateConfig) -> ShapeClassifier {
        ShapeClassifier::new(
            &ClassifierConfig::default(),
            GeometryNormalizer::default(),
            template_config,
            templates,
        )
    }

    #[test]
    fn test_ratio_fallback_without_templates() -> Result<()> {
        let classifier = default_classifier(TemplateSet::new(), &TemplateConfig::default());
        let mask = bar_mask()?;
        let mut report = FrameReport::new();

        let result = classifier.classify(0, Color::Blue, &mask, &mask, &mut report)?;

        assert_eq!(result.shape_type, ShapeType::OneByFour);
        assert_eq!(result.strategy, Some(StrategyKind::AspectRatio));
        let angle = result.angle.expect("geometry found");
        assert!((0.0..180.0).contains(&angle));
        assert!(report
            .iter()
            .any(|e| matches!(e, FrameEvent::TemplateMissing { .. })));
        Ok(())
    }

    #[test]
    fn test_template_takes_priority_over_ratio() -> Result<()> {
        // Identical edge patch for both types: the larger one is tried first
        let mut patch = canvas(12, 12)?;
        fill(&mut patch, Rect::new(6, 0, 6, 12))?;

        let mut templates = TemplateSet::new();
        templates.insert(Template::new(ShapeType::OneByFour, Color::Yellow, patch.clone()));
        templates.insert(Template::new(ShapeType::OneByThree, Color::Yellow, patch));

        let mut config = TemplateConfig::default();
        config.matching_method = MatchingMethod::CCoeffNormed;
        config.thresholds = BTreeMap::from([(
            Color::Yellow,
            BTreeMap::from([(ShapeType::OneByFour, 0.8), (ShapeType::OneByThree, 0.8)]),
        )]);

        let classifier = default_classifier(templates, &config);
        let mask = bar_mask()?;
        let mut report = FrameReport::new();

        let result = classifier.classify(3, Color::Yellow, &mask, &mask, &mut report)?;
        assert_eq!(result.shape_type, ShapeType::OneByFour);
        assert_eq!(result.strategy, Some(StrategyKind::TemplateCorrelation));
        Ok(())
    }

    #[test]
    fn test_geometry_unavailable_is_undefined() -> Result<()> {
        let classifier = default_classifier(TemplateSet::new(), &TemplateConfig::default());
        let mut mask = canvas(100, 100)?;
        fill(&mut mask, Rect::new(40, 40, 10, 10))?;
        let mut report = FrameReport::new();

        let result = classifier.classify(1, Color::Red, &mask, &mask, &mut report)?;

        assert_eq!(result, Classification::undefined(None));
        assert_eq!(
            report.events(),
            &[FrameEvent::GeometryUnavailable {
                index: 1,
                color: Color::Red
            }]
        );
        Ok(())
    }

    #[test]
    fn test_degenerate_box_keeps_angle() -> Result<()> {
        let classifier = ShapeClassifier::new(
            &ClassifierConfig::default(),
            GeometryNormalizer::new(0.0, 0.0),
            &TemplateConfig::default(),
            TemplateSet::new(),
        );
        let mut mask = canvas(50, 50)?;
        fill(&mut mask, Rect::new(10, 20, 30, 1))?;
        let mut report = FrameReport::new();

        let result = classifier.classify(2, Color::Green, &mask, &mask, &mut report)?;

        assert_eq!(result.shape_type, ShapeType::Undefined);
        assert!(result.angle.is_some());
        assert!(matches!(report.events(), [FrameEvent::DegenerateBox { index: 2, .. }]));
        Ok(())
    }

    #[test]
    fn test_strategy_order_follows_config() {
        let config = ClassifierConfig {
            strategies: vec![
                StrategyKind::AspectRatio,
                StrategyKind::TemplateCorrelation,
                StrategyKind::AspectRatio,
            ],
            ..Default::default()
        };
        let classifier = ShapeClassifier::new(
            &config,
            GeometryNormalizer::default(),
            &TemplateConfig::default(),
            TemplateSet::new(),
        );
        assert_eq!(
            classifier.strategy_kinds(),
            vec![StrategyKind::AspectRatio, StrategyKind::TemplateCorrelation]
        );
    }

    #[test]
    fn test_square_red_region_is_two_by_two() -> Result<()> {
        let config = ClassifierConfig {
            strategies: vec![StrategyKind::AspectRatio],
            ..Default::default()
        };
        let classifier = ShapeClassifier::new(
            &config,
            GeometryNormalizer::default(),
            &TemplateConfig::default(),
            TemplateSet::new(),
        );
        let mut mask = canvas(150, 150)?;
        fill(&mut mask, Rect::new(25, 25, 100, 100))?;
        let mut report = FrameReport::new();

        let result = classifier.classify(0, Color::Red, &mask, &mask, &mut report)?;
        assert_eq!(result.shape_type, ShapeType::TwoByTwo);
        assert!(report.is_empty());
        Ok(())
    }
}
