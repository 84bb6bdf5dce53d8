//! Per-frame brick detector: segmentation through classification

use super::config::DetectionConfig;
use crate::classify::ShapeClassifier;
use crate::error::ConfigError;
use crate::regions::extract_rois;
use crate::roi::{cut_with_margin, RoiExt};
use crate::segmentation::Segmentation;
use crate::template::TemplateSet;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use brick_core::{
    Color, ColoredShape, FrameEvent, FrameReport, RegionGroups, ShapeCollection,
    shapes::CollectionStats,
};
use log::{debug, info};
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// Everything produced for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub shapes: ShapeCollection,
    pub report: FrameReport,
    pub stats: DetectionStats,
}

/// Detection statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionStats {
    pub regions_found: usize,
    pub shapes_kept: usize,
    pub classified: usize,
    pub undefined: usize,
    pub shape_stats: CollectionStats,
    pub processing_time_ms: u64,
}

pub struct ShapeDetector {
    config: DetectionConfig,
    classifier: ShapeClassifier,
}

impl ShapeDetector {
    /// Validate `config` and load templates from its directories
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        let templates = config.template_config.loader().load_set()?;
        info!("Loaded {} template(s)", templates.len());
        Self::with_templates(config, templates)
    }

    /// Detector using an already loaded template set
    pub fn with_templates(config: DetectionConfig, templates: TemplateSet) -> Result<Self> {
        config.validate()?;
        let classifier = ShapeClassifier::new(
            &config.classifier,
            config.geometry.clone(),
            &config.template_config,
            templates,
        );

        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect shapes in an image file (BGR)
    pub fn detect_from_file<P: AsRef<Path>>(&self, image_path: P) -> Result<DetectionResult> {
        let image = ImageUtils::load_mat_color(&image_path)
            .with_context(|| format!("Failed to load image: {:?}", image_path.as_ref()))?;
        self.detect(&image)
    }

    /// Foreground pass, then every colour pass restricted to the foreground
    pub fn segment(&self, frame: &Mat) -> Result<BTreeMap<Color, Segmentation>> {
        let segmentation = &self.config.segmentation;
        let foreground = segmentation.foreground.apply(frame)?;

        let mut masks = BTreeMap::new();
        for color in Color::ALL {
            let profile = segmentation
                .colors
                .get(&color)
                .ok_or(ConfigError::MissingColor(color))?;
            let seg = profile
                .apply(&foreground.masked)
                .with_context(|| format!("{} segmentation failed", color))?
                .restrict_to(&foreground.mask)?;
            masks.insert(color, seg);
        }

        Ok(masks)
    }

    /// Run the whole pipeline on a BGR frame
    pub fn detect(&self, frame: &Mat) -> Result<DetectionResult> {
        let start_time = Instant::now();
        let segmentations = self.segment(frame)?;

        let mut groups = RegionGroups::new();
        let mut masks = BTreeMap::new();
        for (color, seg) in segmentations {
            groups.insert(color, extract_rois(&seg.masked)?);
            masks.insert(color, seg.mask);
        }

        self.classify_regions(frame, groups, &masks, start_time)
    }

    /// Run the pipeline from pre-computed single-channel colour masks.
    /// Colours absent from `masks` yield no shapes.
    pub fn detect_in_masks(&self, frame: &Mat, masks: &BTreeMap<Color, Mat>) -> Result<DetectionResult> {
        let start_time = Instant::now();

        let mut groups = RegionGroups::new();
        for (color, mask) in masks {
            groups.insert(*color, extract_rois(mask)?);
        }

        self.classify_regions(frame, groups, masks, start_time)
    }

    fn classify_regions(
        &self,
        frame: &Mat,
        groups: RegionGroups,
        masks: &BTreeMap<Color, Mat>,
        start_time: Instant,
    ) -> Result<DetectionResult> {
        let mut report = FrameReport::new();
        for (color, rois) in &groups {
            debug!("{}: {} region(s)", color, rois.len());
            report.push(FrameEvent::RegionsExtracted {
                color: *color,
                count: rois.len(),
            });
        }

        let all = ShapeCollection::from_regions(&groups);
        let regions_found = all.len();

        let size = frame.size()?;
        let mut shapes = all
            .filter_by_area(self.config.min_pixel_area)
            .map_positions(size.width, size.height);
        report.push(FrameEvent::ShapesFiltered {
            kept: shapes.len(),
            dropped: regions_found - shapes.len(),
        });

        for (index, shape) in shapes.iter_mut().enumerate() {
            let color = shape.color();
            let mask = masks
                .get(&color)
                .with_context(|| format!("No mask for {}", color))?;

            let region_mask = cut_with_margin(mask, &shape.roi(), self.config.roi_margin)?;
            let region_image = cut_with_margin(frame, &shape.roi(), self.config.roi_margin)?;

            let outcome = self
                .classifier
                .classify(index, color, &region_image, &region_mask, &mut report)?;
            shape.assign_classification(outcome.shape_type, outcome.angle)?;

            report.push(FrameEvent::Classified {
                index,
                color,
                shape_type: outcome.shape_type,
                angle: outcome.angle,
                strategy: outcome.strategy,
            });
        }

        let shape_stats = shapes.stats();
        let stats = DetectionStats {
            regions_found,
            shapes_kept: shapes.len(),
            classified: shape_stats.total_shapes - shape_stats.undefined,
            undefined: shape_stats.undefined,
            shape_stats,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "{} region(s), {} kept, {} classified in {} ms",
            stats.regions_found, stats.shapes_kept, stats.classified, stats.processing_time_ms
        );

        Ok(DetectionResult {
            shapes,
            report,
            stats,
        })
    }

    /// Corrected angle of a shape's dominant contour using the angle-only
    /// floor; `None` if no contour qualifies.
    pub fn lookup_angle(&self, shape: &ColoredShape, mask: &Mat) -> Result<Option<f64>> {
        let region = cut_with_margin(mask, &shape.roi(), self.config.roi_margin)?;
        self.config.geometry.angle_only(&region)
    }

    /// Copy of `frame` with boxes, centre markers and labels drawn
    pub fn annotate(&self, frame: &Mat, result: &DetectionResult) -> Result<Mat> {
        let mut output = frame.try_clone().context("Failed to copy frame")?;
        let visualization = &self.config.visualization;

        for shape in result.shapes.iter() {
            let (b, g, r) = shape.color().bgr();
            let bgr = Scalar::new(b as f64, g as f64, r as f64, 0.0);
            let roi = shape.roi();

            if visualization.draw_bboxes {
                imgproc::rectangle(&mut output, roi.to_rect(), bgr, 2, LINE_8, 0)?;
            }

            if visualization.draw_centers {
                imgproc::circle(&mut output, roi.center_point(), 3, bgr, -1, LINE_8, 0)?;
            }

            if visualization.draw_labels {
                let label = match shape.angle {
                    Some(angle) => format!("{} {:.0}", shape.shape_type(), angle),
                    None => shape.shape_type().to_string(),
                };

                imgproc::put_text(
                    &mut output,
                    &label,
                    Point::new(roi.x, (roi.y - 5).max(12)),
                    FONT_HERSHEY_SIMPLEX,
                    0.5,
                    bgr,
                    1,
                    LINE_8,
                    false,
                )?;
            }
        }

        Ok(output)
    }

    pub fn export_json(&self, result: &DetectionResult, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(result)
            .context("Failed to serialize detection results")?;

        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write JSON to: {:?}", output_path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Rect, CV_8UC1, CV_8UC3};

    fn detector() -> Result<ShapeDetector> {
        ShapeDetector::with_templates(DetectionConfig::default(), TemplateSet::new())
    }

    #[test]
    fn test_detector_creation() -> Result<()> {
        let config = DetectionConfig::default().with_template_dirs(vec!["no/such/dir".into()]);
        let _detector = ShapeDetector::new(config)?;
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DetectionConfig::default();
        config.roi_margin = -5;
        assert!(ShapeDetector::with_templates(config, TemplateSet::new()).is_err());
    }

    #[test]
    fn test_blank_frame_has_no_shapes() -> Result<()> {
        let frame = Mat::new_rows_cols_with_default(120, 120, CV_8UC3, Scalar::all(0.0))?;
        let result = detector()?.detect(&frame)?;

        assert!(result.shapes.is_empty());
        assert_eq!(result.stats.regions_found, 0);
        Ok(())
    }

    #[test]
    fn test_annotate_keeps_frame_size() -> Result<()> {
        let frame = Mat::new_rows_cols_with_default(200, 200, CV_8UC3, Scalar::all(0.0))?;
        let mut mask = Mat::new_rows_cols_with_default(200, 200, CV_8UC1, Scalar::all(0.0))?;
        imgproc::rectangle(&mut mask, Rect::new(50, 80, 100, 25), Scalar::all(255.0), imgproc::FILLED, LINE_8, 0)?;

        let detector = detector()?;
        let result = detector.detect_in_masks(&frame, &BTreeMap::from([(Color::Yellow, mask)]))?;
        let annotated = detector.annotate(&frame, &result)?;

        assert_eq!(annotated.size()?, frame.size()?);
        assert!(opencv::core::count_non_zero(&ImageUtils::to_grayscale(&annotated)?)? > 0);
        Ok(())
    }
}
