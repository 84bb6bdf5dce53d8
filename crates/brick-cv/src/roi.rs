//! ROI conversions and context re-cuts
//!
//! Bridges `brick_core::Roi` and OpenCV rectangles, and cuts a shape's region
//! back out of a full-frame image with a margin of surrounding context.

use crate::Result;
use anyhow::Context;
use brick_core::Roi;
use opencv::{
    core::{Mat, Point, Rect, Size},
    prelude::*,
};

/// Conversions between `Roi` and OpenCV types
pub trait RoiExt {
    fn from_rect(rect: Rect) -> Self;
    fn to_rect(&self) -> Rect;
    fn center_point(&self) -> Point;
}

impl RoiExt for Roi {
    fn from_rect(rect: Rect) -> Self {
        Roi::new(rect.x, rect.y, rect.width, rect.height)
    }

    fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn center_point(&self) -> Point {
        let (x, y) = self.center();
        Point::new(x, y)
    }
}

/// Span `[start, start + len)` widened by `margin` on both sides if the
/// widened span still fits in `[0, limit)`; otherwise the span unchanged.
fn pad_axis(start: i32, len: i32, margin: i32, limit: i32) -> (i32, i32) {
    let padded_start = start - margin;
    let padded_end = start + len + margin;
    if padded_start >= 0 && padded_end <= limit {
        (padded_start, len + 2 * margin)
    } else {
        (start, len)
    }
}

/// Rectangle around `roi` with `margin` pixels of context, decided for each
/// axis independently, clipped to the image.
pub fn padded_rect(roi: &Roi, margin: i32, image_size: Size) -> Rect {
    let (x, width) = pad_axis(roi.x, roi.width, margin, image_size.width);
    let (y, height) = pad_axis(roi.y, roi.height, margin, image_size.height);

    // Clip so a ROI from a differently sized frame still yields a valid cut
    let x = x.clamp(0, image_size.width);
    let y = y.clamp(0, image_size.height);
    let width = width.min(image_size.width - x).max(0);
    let height = height.min(image_size.height - y).max(0);

    Rect::new(x, y, width, height)
}

/// Owned copy of `image` inside `roi` plus margin
pub fn cut_with_margin(image: &Mat, roi: &Roi, margin: i32) -> Result<Mat> {
    let rect = padded_rect(roi, margin, image.size()?);
    let region = Mat::roi(image, rect)
        .with_context(|| format!("Failed to cut region {:?}", rect))?;
    region
        .try_clone()
        .context("Failed to copy region")
}
