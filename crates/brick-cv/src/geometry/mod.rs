//! Minimum-area bounding rectangles and rotation-angle normalisation

use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use opencv::{
    core::{Mat, Point, Vector},
    imgproc,
};
use serde::{Deserialize, Serialize};

/// Contour area floor when the box is used for shape typing
pub const SHAPE_TYPING_MIN_AREA: f64 = 1000.0;
/// Contour area floor when only the angle is needed
pub const ANGLE_LOOKUP_MIN_AREA: f64 = 400.0;

/// Normalise a rotated-rectangle angle into `[0, 180)`.
///
/// The result is the orientation of the rectangle's shorter side, so it does
/// not depend on which side the rectangle routine reported as width.
pub fn corrected_angle(raw: f64, width: f64, height: f64) -> f64 {
    let mut angle = raw - 90.0;
    if width < height {
        angle += 90.0;
    }
    let reduced = angle.rem_euclid(180.0);
    // rem_euclid rounds tiny negatives up to exactly 180
    if reduced >= 180.0 { 0.0 } else { reduced }
}

/// Rotated bounding box of the dominant contour in a mask region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinBoundingBox {
    pub center: (f32, f32),
    /// `None` when either side is zero
    pub size: Option<(f32, f32)>,
    /// Corrected angle in degrees, `[0, 180)`
    pub angle: f64,
}

impl MinBoundingBox {
    /// Long side over short side; `None` for a degenerate box
    pub fn ratio(&self) -> Option<f64> {
        let (w, h) = self.size?;
        let (w, h) = (w as f64, h as f64);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(w.max(h) / w.min(h))
    }
}

/// Area floors for the two kinds of lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryNormalizer {
    pub typing_min_area: f64,
    pub angle_min_area: f64,
}

impl Default for GeometryNormalizer {
    fn default() -> Self {
        Self {
            typing_min_area: SHAPE_TYPING_MIN_AREA,
            angle_min_area: ANGLE_LOOKUP_MIN_AREA,
        }
    }
}

impl GeometryNormalizer {
    pub fn new(typing_min_area: f64, angle_min_area: f64) -> Self {
        Self {
            typing_min_area,
            angle_min_area,
        }
    }

    /// Box used for shape typing
    pub fn for_typing(&self, mask: &Mat) -> Result<Option<MinBoundingBox>> {
        Self::min_bounding_box(mask, self.typing_min_area)
    }

    /// Corrected angle of the dominant contour, with the lower area floor
    pub fn angle_only(&self, mask: &Mat) -> Result<Option<f64>> {
        Ok(Self::min_bounding_box(mask, self.angle_min_area)?.map(|b| b.angle))
    }

    /// Minimum-area rectangle of the largest external contour whose area is at
    /// least `min_area`. `None` when no contour qualifies.
    pub fn min_bounding_box(mask: &Mat, min_area: f64) -> Result<Option<MinBoundingBox>> {
        let gray = ImageUtils::to_grayscale(mask)?;

        let mut contours = Vector::<Vector<Point>>::new();
        imgproc::find_contours_def(
            &gray,
            &mut contours,
            imgproc::RETR_EXTERNAL,
            imgproc::CHAIN_APPROX_SIMPLE,
        )
        .context("Contour detection failed")?;

        let mut best: Option<Vector<Point>> = None;
        let mut max_area = 0.0;

        for contour in contours.iter() {
            let area = imgproc::contour_area(&contour, false).context("Contour area failed")?;
            if area < min_area {
                continue;
            }
            if best.is_none() || area > max_area {
                max_area = area;
                best = Some(contour);
            }
        }

        let Some(contour) = best else {
            return Ok(None);
        };

        let rect = imgproc::min_area_rect(&contour).context("min_area_rect failed")?;
        let (w, h) = (rect.size.width, rect.size.height);
        let angle = corrected_angle(rect.angle as f64, w as f64, h as f64);

        let size = if w == 0.0 || h == 0.0 { None } else { Some((w, h)) };

        Ok(Some(MinBoundingBox {
            center: (rect.center.x, rect.center.y),
            size,
            angle,
        }))
    }
}
