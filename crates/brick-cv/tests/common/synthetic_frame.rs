use anyhow::Result;
use opencv::{
    core::{Mat, Rect, Scalar, CV_8UC1, CV_8UC3},
    imgproc,
};

/// Black BGR frame
pub fn black_frame(width: i32, height: i32) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(0.0))?)
}

/// All-zero single-channel mask
pub fn empty_mask(width: i32, height: i32) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(height, width, CV_8UC1, Scalar::all(0.0))?)
}

/// Filled rectangle in BGR (or 255 on a mask)
pub fn paint(image: &mut Mat, rect: Rect, bgr: (u8, u8, u8)) -> Result<()> {
    let (b, g, r) = bgr;
    imgproc::rectangle(
        image,
        rect,
        Scalar::new(b as f64, g as f64, r as f64, 0.0),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

/// Mask with one filled rectangle
pub fn mask_with(width: i32, height: i32, rect: Rect) -> Result<Mat> {
    let mut mask = empty_mask(width, height)?;
    paint(&mut mask, rect, (255, 255, 255))?;
    Ok(mask)
}

/// 12x12 patch, dark left half and bright right half
pub fn edge_patch() -> Result<Mat> {
    let mut patch = empty_mask(12, 12)?;
    paint(&mut patch, Rect::new(6, 0, 6, 12), (255, 255, 255))?;
    Ok(patch)
}

/// 12x12 checkerboard of 3px cells
pub fn checkerboard_patch() -> Result<Mat> {
    let mut patch = empty_mask(12, 12)?;
    for row in 0..4 {
        for col in 0..4 {
            if (row + col) % 2 == 0 {
                paint(&mut patch, Rect::new(col * 3, row * 3, 3, 3), (255, 255, 255))?;
            }
        }
    }
    Ok(patch)
}
