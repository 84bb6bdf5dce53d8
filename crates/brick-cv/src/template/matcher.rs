//! Template matching implementation using OpenCV

use super::{MatchingMethod, TemplateConfig, TemplateSet, ThresholdTable};
use crate::traits::TemplateMatchable;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use brick_core::{Color, FrameEvent, FrameReport, ShapeType};
use log::{debug, warn};
use opencv::{
    core::{self, Mat, Point2f, Scalar, Size},
    imgproc,
    prelude::*,
};

/// Scores a shape region against per-colour reference images
pub struct TemplateMatcher {
    method: MatchingMethod,
    thresholds: ThresholdTable,
}

impl TemplateMatcher {
    pub fn new(method: MatchingMethod, thresholds: ThresholdTable) -> Self {
        Self { method, thresholds }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(config.matching_method, config.thresholds.clone())
    }

    pub fn threshold(&self, color: Color, shape_type: ShapeType) -> Option<f64> {
        self.thresholds.get(&color)?.get(&shape_type).copied()
    }

    /// Decide between the two members of the colour's family.
    ///
    /// The region is rotated by `angle` so its long axis stands vertical,
    /// then the larger type is tried before the smaller one; the first
    /// template whose peak score reaches its threshold wins. A missing
    /// template or threshold counts as no match.
    pub fn identify(
        &self,
        color: Color,
        region: &Mat,
        angle: f64,
        templates: &TemplateSet,
        report: &mut FrameReport,
    ) -> Result<Option<ShapeType>> {
        let gray = ImageUtils::to_grayscale(region)?;
        let rotated = Self::rotate_expanded(&gray, angle)?;

        for shape_type in color.family().members() {
            let Some(template) = templates.get(color, shape_type) else {
                report.push(FrameEvent::TemplateMissing { color, shape_type });
                continue;
            };
            let Some(threshold) = self.threshold(color, shape_type) else {
                warn!("No threshold configured for {}", template.name);
                continue;
            };

            let padded = Self::pad_to_template(&rotated, template.image.size()?)?;
            let score = self.peak_score(&padded, &template.image)?;
            debug!("{}: score {:.3}, threshold {:.3}", template.name, score, threshold);

            report.push(FrameEvent::TemplateScored {
                color,
                shape_type,
                score,
                threshold,
            });

            if score >= threshold {
                return Ok(Some(shape_type));
            }
        }

        Ok(None)
    }

    /// Rotate counter-clockwise by `angle` degrees about the image centre,
    /// growing the canvas so no corner is clipped. Uncovered pixels are zero.
    pub fn rotate_expanded(image: &Mat, angle: f64) -> Result<Mat> {
        let size = image.size()?;
        let center = Point2f::new((size.width / 2) as f32, (size.height / 2) as f32);

        let mut matrix = imgproc::get_rotation_matrix_2d(center, angle, 1.0)
            .context("Rotation matrix failed")?;
        let cos = matrix.at_2d::<f64>(0, 0)?.abs();
        let sin = matrix.at_2d::<f64>(0, 1)?.abs();

        let new_width = (size.height as f64 * sin + size.width as f64 * cos) as i32;
        let new_height = (size.height as f64 * cos + size.width as f64 * sin) as i32;

        *matrix.at_2d_mut::<f64>(0, 2)? += (new_width - size.width).div_euclid(2) as f64;
        *matrix.at_2d_mut::<f64>(1, 2)? += (new_height - size.height).div_euclid(2) as f64;

        let mut rotated = Mat::default();
        imgproc::warp_affine(
            image,
            &mut rotated,
            &matrix,
            Size::new(new_width, new_height),
            imgproc::INTER_CUBIC,
            core::BORDER_CONSTANT,
            Scalar::default(),
        )
        .context("Rotation failed")?;

        Ok(rotated)
    }

    /// Zero-pad `image` symmetrically until it is at least `template` in
    /// both dimensions; larger images are returned unchanged.
    pub fn pad_to_template(image: &Mat, template: Size) -> Result<Mat> {
        let size = image.size()?;
        let pad_w = (template.width - size.width).max(0);
        let pad_h = (template.height - size.height).max(0);

        if pad_w == 0 && pad_h == 0 {
            return image.try_clone().context("Failed to copy region");
        }

        let mut padded = Mat::default();
        core::copy_make_border(
            image,
            &mut padded,
            pad_h / 2,
            pad_h - pad_h / 2,
            pad_w / 2,
            pad_w - pad_w / 2,
            core::BORDER_CONSTANT,
            Scalar::default(),
        )
        .context("Padding failed")?;

        Ok(padded)
    }
}

impl TemplateMatchable for TemplateMatcher {
    fn peak_score(&self, image: &Mat, template: &Mat) -> Result<f64> {
        // match_template needs both inputs at the same depth
        let mut converted = Mat::default();
        let image = if image.typ() != template.typ() {
            image
                .convert_to(&mut converted, template.typ(), 1.0, 0.0)
                .context("Failed to convert region to template depth")?;
            &converted
        } else {
            image
        };

        let mut result = Mat::default();
        imgproc::match_template(
            image,
            template,
            &mut result,
            self.method.to_opencv(),
            &core::no_array(),
        )
        .context("Template matching failed")?;

        let mut min_val = 0.0;
        let mut max_val = 0.0;
        core::min_max_loc(
            &result,
            Some(&mut min_val),
            Some(&mut max_val),
            None,
            None,
            &core::no_array(),
        )
        .context("Failed to locate peak")?;

        let score = if self.method.is_inverted() {
            1.0 - min_val
        } else {
            max_val
        };

        Ok(if score.is_finite() { score } else { -1.0 })
    }
}
