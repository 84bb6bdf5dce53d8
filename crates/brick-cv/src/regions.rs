//! Region extraction: external contours reduced to bounding boxes

use crate::roi::RoiExt;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use brick_core::Roi;
use opencv::{
    core::{Mat, Point, Vector},
    imgproc,
};

/// Bounding boxes of all outermost foreground contours in `masked`.
///
/// Accepts a binary mask or a masked colour image; colour input is reduced
/// to grayscale first. Any non-zero pixel counts as foreground.
pub fn extract_rois(masked: &Mat) -> Result<Vec<Roi>> {
    let gray = ImageUtils::to_grayscale(masked)?;

    let mut contours = Vector::<Vector<Point>>::new();
    imgproc::find_contours_def(
        &gray,
        &mut contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
    )
    .context("Contour detection failed")?;

    let mut rois = Vec::with_capacity(contours.len());
    for contour in contours.iter() {
        let rect = imgproc::bounding_rect(&contour).context("Bounding rect failed")?;
        rois.push(Roi::from_rect(rect));
    }

    Ok(rois)
}
