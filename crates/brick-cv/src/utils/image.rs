//! Image processing utilities using opencv-match conversions

use crate::Result;
use anyhow::Context;
use opencv::{
    core::{Mat, Rect},
    imgcodecs::{self, IMREAD_COLOR},
    imgproc,
    prelude::*,
};
use opencv_match::prelude::*;
use std::path::Path;

/// Image utility functions leveraging opencv-match conversions
pub struct ImageUtils;

impl ImageUtils {
    /// Load image as grayscale Mat using opencv-match
    pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<Mat> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?
            .to_rgba8();

        opencv_match::convert::mat_to_grayscale(&img.try_into_cv()?, true)
            .context("Failed to convert image to grayscale")
    }

    /// Load image directly from path as OpenCV Mat (BGR)
    pub fn load_mat_color<P: AsRef<Path>>(path: P) -> Result<Mat> {
        let path_str = path.as_ref().to_string_lossy();

        let mat = imgcodecs::imread(&path_str, IMREAD_COLOR)
            .with_context(|| format!("Failed to load color image: {}", path_str))?;
        anyhow::ensure!(!mat.empty(), "Image is empty or unreadable: {}", path_str);
        Ok(mat)
    }

    /// Save Mat as image
    pub fn save_image<P: AsRef<Path>>(mat: &Mat, path: P) -> Result<()> {
        let path_str = path.as_ref().to_string_lossy();

        imgcodecs::imwrite(&path_str, mat, &opencv::core::Vector::new())
            .with_context(|| format!("Failed to save image: {}", path_str))?;

        Ok(())
    }

    /// Single-channel copy of `image`; BGR and BGRA input is converted
    pub fn to_grayscale(image: &Mat) -> Result<Mat> {
        let code = match image.channels() {
            1 => return image.try_clone().context("Failed to copy grayscale image"),
            4 => imgproc::COLOR_BGRA2GRAY,
            _ => imgproc::COLOR_BGR2GRAY,
        };

        let mut gray = Mat::default();
        imgproc::cvt_color_def(image, &mut gray, code).context("Grayscale conversion failed")?;
        Ok(gray)
    }

    /// Largest centred square of the frame
    pub fn center_square(image: &Mat) -> Result<Mat> {
        let size = image.size()?;
        let length = size.width.min(size.height);
        let rect = Rect::new(
            (size.width - length) / 2,
            (size.height - length) / 2,
            length,
            length,
        );

        Mat::roi(image, rect)
            .context("Failed to crop centre square")?
            .try_clone()
            .context("Failed to copy centre square")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, Size, CV_8UC1, CV_8UC3};

    #[test]
    fn test_center_square() -> Result<()> {
        let image = Mat::new_rows_cols_with_default(60, 100, CV_8UC3, Scalar::all(0.0))?;
        let square = ImageUtils::center_square(&image)?;
        assert_eq!(square.size()?, Size::new(60, 60));
        Ok(())
    }

    #[test]
    fn test_grayscale_passthrough_and_conversion() -> Result<()> {
        let gray = Mat::new_rows_cols_with_default(10, 10, CV_8UC1, Scalar::all(7.0))?;
        assert_eq!(ImageUtils::to_grayscale(&gray)?.channels(), 1);

        let color = Mat::new_rows_cols_with_default(10, 10, CV_8UC3, Scalar::all(100.0))?;
        let converted = ImageUtils::to_grayscale(&color)?;
        assert_eq!(converted.channels(), 1);
        assert_eq!(*converted.at_2d::<u8>(3, 3)?, 100);
        Ok(())
    }

    #[test]
    fn test_save_and_reload_grayscale() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("patch.png");
        let patch = Mat::new_rows_cols_with_default(12, 8, CV_8UC1, Scalar::all(200.0))?;

        ImageUtils::save_image(&patch, &path)?;
        let loaded = ImageUtils::load_grayscale(&path)?;
        assert_eq!(loaded.size()?, Size::new(8, 12));
        Ok(())
    }

    #[test]
    fn test_missing_color_image_is_error() {
        assert!(ImageUtils::load_mat_color("does/not/exist.png").is_err());
    }
}
