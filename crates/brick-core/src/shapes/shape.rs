use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color::Color;
use super::kind::ShapeType;
use super::roi::Roi;

/// One detected brick within a single frame.
///
/// `roi` and `color` are fixed at creation. The remaining fields are filled
/// by the pipeline stages in this order: position, then geometry and
/// classification (`assign_classification`, which may run only once).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoredShape {
    roi: Roi,
    color: Color,
    /// Bounding-box centre in unit-square coordinates
    pub position: Option<(f64, f64)>,
    /// Corrected rotation angle in degrees, `[0, 180)`
    pub angle: Option<f64>,
    shape_type: ShapeType,
    /// Survives a JSON round trip so a reloaded shape stays one-shot
    #[serde(default)]
    classified: bool,
}

impl ColoredShape {
    pub fn new(roi: Roi, color: Color) -> Self {
        Self {
            roi,
            color,
            position: None,
            angle: None,
            shape_type: ShapeType::Undefined,
            classified: false,
        }
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    pub fn is_classified(&self) -> bool {
        self.classified
    }

    /// Record the classifier outcome. Fails if the shape was already
    /// classified this frame.
    pub fn assign_classification(&mut self, shape_type: ShapeType, angle: Option<f64>) -> Result<()> {
        if self.classified {
            bail!(
                "{} shape at {:?} was already classified as {}",
                self.color,
                self.roi,
                self.shape_type
            );
        }
        self.shape_type = shape_type;
        self.angle = angle;
        self.classified = true;
        Ok(())
    }
}

impl fmt::Display for ColoredShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((x, y)) => write!(
                f,
                "{} {} Brick at ({:.2}, {:.2})",
                self.color, self.shape_type, x, y
            ),
            None => write!(
                f,
                "{} {} Brick at undefined position",
                self.color, self.shape_type
            ),
        }
    }
}
