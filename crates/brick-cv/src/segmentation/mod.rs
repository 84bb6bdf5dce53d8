//! HSV colour segmentation with morphological clean-up

use crate::error::ConfigError;
use crate::Result;
use anyhow::Context;
use opencv::{
    core::{self, Mat, Point, Scalar, Size},
    imgproc,
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// Inclusive bounds in OpenCV 8-bit HSV space (H in [0, 180), S and V in [0, 255])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    fn to_scalars(&self) -> (Scalar, Scalar) {
        let [lh, ls, lv] = self.lower;
        let [uh, us, uv] = self.upper;
        (
            Scalar::new(lh as f64, ls as f64, lv as f64, 0.0),
            Scalar::new(uh as f64, us as f64, uv as f64, 0.0),
        )
    }

    fn is_ordered(&self) -> bool {
        self.lower.iter().zip(self.upper.iter()).all(|(l, u)| l <= u)
    }
}

/// Kernel size and hue ranges for one segmentation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    pub kernel_size: i32,
    /// Sub-ranges are unioned; red needs two because hue wraps around
    pub ranges: Vec<HsvRange>,
}

impl ColorProfile {
    pub fn new(kernel_size: i32, ranges: Vec<HsvRange>) -> Self {
        Self {
            kernel_size,
            ranges,
        }
    }

    pub fn single(kernel_size: i32, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self::new(kernel_size, vec![HsvRange::new(lower, upper)])
    }

    pub fn validate(&self, profile: &str) -> std::result::Result<(), ConfigError> {
        if self.kernel_size < 1 {
            return Err(ConfigError::ZeroKernel {
                profile: profile.to_string(),
            });
        }
        if self.ranges.is_empty() {
            return Err(ConfigError::NoRanges {
                profile: profile.to_string(),
            });
        }
        if let Some(range) = self.ranges.iter().find(|r| !r.is_ordered()) {
            return Err(ConfigError::InvertedRange {
                profile: profile.to_string(),
                lower: range.lower,
                upper: range.upper,
            });
        }
        Ok(())
    }

    pub fn apply(&self, image: &Mat) -> Result<Segmentation> {
        ColorSegmenter::segment(image, self.kernel_size, &self.ranges)
    }
}

/// Output of one segmentation pass
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Single-channel binary mask
    pub mask: Mat,
    /// Source image with everything outside the mask set to zero
    pub masked: Mat,
}

impl Segmentation {
    /// Intersect the mask with `foreground` and re-apply it
    pub fn restrict_to(self, foreground: &Mat) -> Result<Self> {
        let mut mask = Mat::default();
        core::bitwise_and(&self.mask, foreground, &mut mask, &core::no_array())
            .context("Failed to intersect masks")?;

        let mut masked = Mat::default();
        core::bitwise_and(&self.masked, &self.masked, &mut masked, &mask)
            .context("Failed to apply restricted mask")?;

        Ok(Self { mask, masked })
    }
}

/// Stateless HSV segmenter
pub struct ColorSegmenter;

impl ColorSegmenter {
    /// Threshold `image` (BGR) against the union of `ranges`, clean the mask
    /// with an opening followed by a closing, and apply it to the image.
    pub fn segment(image: &Mat, kernel_size: i32, ranges: &[HsvRange]) -> Result<Segmentation> {
        anyhow::ensure!(!ranges.is_empty(), "At least one HSV range is required");

        let hsv = Self::to_hsv(image)?;
        let mask = Self::threshold(&hsv, ranges)?;
        let cleaned = Self::open_and_close(&mask, kernel_size)?;

        let mut masked = Mat::default();
        core::bitwise_and(image, image, &mut masked, &cleaned)
            .context("Failed to apply mask to image")?;

        Ok(Segmentation {
            mask: cleaned,
            masked,
        })
    }

    pub fn to_hsv(image: &Mat) -> Result<Mat> {
        let mut hsv = Mat::default();
        imgproc::cvt_color_def(image, &mut hsv, imgproc::COLOR_BGR2HSV)
            .context("BGR to HSV conversion failed")?;
        Ok(hsv)
    }

    fn threshold(hsv: &Mat, ranges: &[HsvRange]) -> Result<Mat> {
        let mut combined: Option<Mat> = None;

        for range in ranges {
            let (lower, upper) = range.to_scalars();
            let mut sub_mask = Mat::default();
            core::in_range(hsv, &lower, &upper, &mut sub_mask)
                .with_context(|| format!("in_range failed for {:?}", range))?;

            combined = Some(match combined {
                None => sub_mask,
                Some(previous) => {
                    let mut merged = Mat::default();
                    core::bitwise_or(&previous, &sub_mask, &mut merged, &core::no_array())
                        .context("Failed to merge hue sub-ranges")?;
                    merged
                }
            });
        }

        combined.context("No mask produced")
    }

    /// Opening (erode, dilate) then closing (dilate, erode) with a square kernel
    pub fn open_and_close(mask: &Mat, kernel_size: i32) -> Result<Mat> {
        let kernel = imgproc::get_structuring_element(
            imgproc::MORPH_RECT,
            Size::new(kernel_size, kernel_size),
            Point::new(-1, -1),
        )
        .context("Kernel creation failed")?;
        let border_value = imgproc::morphology_default_border_value()?;

        let mut opened = Mat::default();
        imgproc::morphology_ex(
            mask,
            &mut opened,
            imgproc::MORPH_OPEN,
            &kernel,
            Point::new(-1, -1),
            1,
            core::BORDER_CONSTANT,
            border_value,
        )
        .context("Opening failed")?;

        let mut closed = Mat::default();
        imgproc::morphology_ex(
            &opened,
            &mut closed,
            imgproc::MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            1,
            core::BORDER_CONSTANT,
            border_value,
        )
        .context("Closing failed")?;

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Rect, CV_8UC3};

    fn paint(image: &mut Mat, rect: Rect, bgr: (f64, f64, f64)) -> Result<()> {
        imgproc::rectangle(
            image,
            rect,
            Scalar::new(bgr.0, bgr.1, bgr.2, 0.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;
        Ok(())
    }

    #[test]
    fn test_red_wraps_around_hue() -> Result<()> {
        let mut image = Mat::new_rows_cols_with_default(20, 20, CV_8UC3, Scalar::all(0.0))?;
        // Hue 2 and hue 178 in OpenCV's half-degree scale
        paint(&mut image, Rect::new(5, 5, 1, 1), (0.0, 17.0, 255.0))?;
        paint(&mut image, Rect::new(15, 15, 1, 1), (17.0, 0.0, 255.0))?;

        let ranges = [
            HsvRange::new([0, 75, 0], [10, 255, 255]),
            HsvRange::new([170, 75, 0], [179, 255, 255]),
        ];
        let seg = ColorSegmenter::segment(&image, 1, &ranges)?;

        assert_eq!(*seg.mask.at_2d::<u8>(5, 5)?, 255);
        assert_eq!(*seg.mask.at_2d::<u8>(15, 15)?, 255);
        assert_eq!(core::count_non_zero(&seg.mask)?, 2);
        Ok(())
    }

    #[test]
    fn test_opening_removes_isolated_pixels() -> Result<()> {
        let mut image = Mat::new_rows_cols_with_default(60, 60, CV_8UC3, Scalar::all(0.0))?;
        paint(&mut image, Rect::new(10, 10, 20, 20), (255.0, 0.0, 0.0))?;
        paint(&mut image, Rect::new(50, 50, 1, 1), (255.0, 0.0, 0.0))?;

        let seg = ColorSegmenter::segment(&image, 3, &[HsvRange::new([100, 100, 0], [170, 255, 255])])?;

        assert_eq!(core::count_non_zero(&seg.mask)?, 400);
        assert_eq!(*seg.mask.at_2d::<u8>(50, 50)?, 0);
        assert_eq!(*seg.masked.at_2d::<core::Vec3b>(15, 15)?, core::Vec3b::from([255, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_closing_fills_small_gaps() -> Result<()> {
        let mut image = Mat::new_rows_cols_with_default(60, 60, CV_8UC3, Scalar::all(0.0))?;
        paint(&mut image, Rect::new(10, 10, 40, 20), (0.0, 255.0, 0.0))?;
        // One-pixel slit through the middle of the bar
        paint(&mut image, Rect::new(30, 10, 1, 20), (0.0, 0.0, 0.0))?;

        let seg = ColorSegmenter::segment(&image, 3, &[HsvRange::new([50, 27, 0], [100, 255, 255])])?;

        assert_eq!(*seg.mask.at_2d::<u8>(20, 30)?, 255);
        Ok(())
    }

    #[test]
    fn test_restrict_to_foreground() -> Result<()> {
        let mut image = Mat::new_rows_cols_with_default(30, 30, CV_8UC3, Scalar::all(0.0))?;
        paint(&mut image, Rect::new(5, 5, 10, 10), (0.0, 0.0, 200.0))?;

        // Black background falls inside the low red range when saturation is unconstrained
        let red = ColorSegmenter::segment(&image, 1, &[HsvRange::new([0, 0, 0], [10, 255, 255])])?;
        assert_eq!(core::count_non_zero(&red.mask)?, 900);

        let foreground = ColorSegmenter::segment(&image, 1, &[HsvRange::new([0, 75, 0], [179, 255, 255])])?;
        let restricted = red.restrict_to(&foreground.mask)?;
        assert_eq!(core::count_non_zero(&restricted.mask)?, 100);
        Ok(())
    }

    #[test]
    fn test_profile_validation() {
        assert!(ColorProfile::single(3, [0, 0, 0], [10, 255, 255]).validate("red").is_ok());
        assert_eq!(
            ColorProfile::single(0, [0, 0, 0], [10, 255, 255]).validate("red"),
            Err(ConfigError::ZeroKernel {
                profile: "red".into()
            })
        );
        assert!(matches!(
            ColorProfile::single(3, [20, 0, 0], [10, 255, 255]).validate("red"),
            Err(ConfigError::InvertedRange { .. })
        ));
        assert!(matches!(
            ColorProfile::new(3, vec![]).validate("red"),
            Err(ConfigError::NoRanges { .. })
        ));
    }
}
