//! Per-frame shape collection: registry construction, area filtering and
//! unit-square position mapping.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::color::Color;
use super::kind::ShapeType;
use super::roi::Roi;
use super::shape::ColoredShape;

/// Raw regions grouped by the colour pass that produced them
pub type RegionGroups = BTreeMap<Color, Vec<Roi>>;

/// Ordered collection of shapes for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeCollection {
    shapes: Vec<ColoredShape>,
}

impl ShapeCollection {
    pub fn from_vec(shapes: Vec<ColoredShape>) -> Self {
        Self { shapes }
    }

    /// One unclassified shape per region, colour order first, then the
    /// order regions were found in.
    pub fn from_regions(groups: &RegionGroups) -> Self {
        groups
            .iter()
            .flat_map(|(color, rois)| rois.iter().map(move |roi| ColoredShape::new(*roi, *color)))
            .collect()
    }

    /// Keep shapes whose ROI area is strictly greater than `min_pixel_area`
    pub fn filter_by_area(mut self, min_pixel_area: i64) -> Self {
        self.shapes.retain(|shape| shape.roi().area() > min_pixel_area);
        self
    }

    /// Set every shape's position to its ROI centre divided by the frame's
    /// shorter edge. Positions stay unset for an empty frame.
    pub fn map_positions(mut self, frame_width: i32, frame_height: i32) -> Self {
        let length = frame_width.min(frame_height);
        if length <= 0 {
            return self;
        }
        let length = length as f64;

        for shape in &mut self.shapes {
            let (cx, cy) = shape.roi().center();
            shape.position = Some((cx as f64 / length, cy as f64 / length));
        }
        self
    }

    pub fn as_slice(&self) -> &[ColoredShape] {
        &self.shapes
    }

    pub fn as_mut_slice(&mut self) -> &mut [ColoredShape] {
        &mut self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn stats(&self) -> CollectionStats {
        let mut type_counts: HashMap<ShapeType, usize> = HashMap::new();
        let mut color_counts: HashMap<Color, usize> = HashMap::new();

        for shape in &self.shapes {
            *type_counts.entry(shape.shape_type()).or_insert(0) += 1;
            *color_counts.entry(shape.color()).or_insert(0) += 1;
        }

        CollectionStats {
            total_shapes: self.shapes.len(),
            undefined: type_counts.get(&ShapeType::Undefined).copied().unwrap_or(0),
            type_counts,
            color_counts,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColoredShape> {
        self.shapes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColoredShape> {
        self.shapes.iter_mut()
    }
}

impl IntoIterator for ShapeCollection {
    type Item = ColoredShape;
    type IntoIter = std::vec::IntoIter<ColoredShape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.into_iter()
    }
}

impl FromIterator<ColoredShape> for ShapeCollection {
    fn from_iter<T: IntoIterator<Item = ColoredShape>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Counts over a classified collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total_shapes: usize,
    pub undefined: usize,
    pub type_counts: HashMap<ShapeType, usize>,
    pub color_counts: HashMap<Color, usize>,
}
