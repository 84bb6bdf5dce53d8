//! Template matching module

pub mod loader;
pub mod matcher;

pub use loader::TemplateLoader;
pub use matcher::TemplateMatcher;

use brick_core::{Color, Family, ShapeType};
use opencv::core::Mat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Template data structure
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub shape_type: ShapeType,
    pub color: Color,
    /// Grayscale, long axis vertical
    pub image: Mat,
    pub metadata: HashMap<String, String>,
}

impl Template {
    pub fn new(shape_type: ShapeType, color: Color, image: Mat) -> Self {
        Self {
            name: TemplateLoader::stem_for(shape_type, color),
            shape_type,
            color,
            image,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Reference images keyed by (colour, shape type)
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<(Color, ShapeType), Template>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous template for the same pair
    pub fn insert(&mut self, template: Template) {
        self.templates
            .insert((template.color, template.shape_type), template);
    }

    pub fn get(&self, color: Color, shape_type: ShapeType) -> Option<&Template> {
        self.templates.get(&(color, shape_type))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Pairs of the colour's family that have no template
    pub fn missing(&self, color: Color) -> Vec<ShapeType> {
        color
            .family()
            .members()
            .into_iter()
            .filter(|t| self.get(color, *t).is_none())
            .collect()
    }
}

/// Template matching method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingMethod {
    /// Normalized cross-correlation
    CCorrNormed,
    /// Correlation coefficient (robust to linear lighting changes)
    CCoeffNormed,
    /// Squared difference (inverted: lower is better)
    SqDiffNormed,
}

impl MatchingMethod {
    pub fn to_opencv(&self) -> i32 {
        use opencv::imgproc::*;
        match self {
            MatchingMethod::CCorrNormed => TM_CCORR_NORMED,
            MatchingMethod::CCoeffNormed => TM_CCOEFF_NORMED,
            MatchingMethod::SqDiffNormed => TM_SQDIFF_NORMED,
        }
    }

    pub fn is_inverted(&self) -> bool {
        matches!(self, MatchingMethod::SqDiffNormed)
    }
}

/// Per-colour, per-type acceptance thresholds
pub type ThresholdTable = BTreeMap<Color, BTreeMap<ShapeType, f64>>;

/// Template matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub template_dirs: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub matching_method: MatchingMethod,
    pub thresholds: ThresholdTable,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            template_dirs: vec![PathBuf::from("templates")],
            extensions: ["png", "jpg", "jpeg", "bmp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            matching_method: MatchingMethod::CCoeffNormed,
            thresholds: default_thresholds(),
        }
    }
}

impl TemplateConfig {
    /// Threshold for a pair, `None` if unconfigured
    pub fn threshold(&self, color: Color, shape_type: ShapeType) -> Option<f64> {
        self.thresholds.get(&color)?.get(&shape_type).copied()
    }

    /// Loader searching this configuration's directories and extensions
    pub fn loader(&self) -> TemplateLoader {
        let mut loader = TemplateLoader::with_extensions(self.extensions.clone());
        for dir in &self.template_dirs {
            loader = loader.add_template_dir(dir);
        }
        loader
    }
}

fn default_thresholds() -> ThresholdTable {
    let table: [(Color, Family, f64, f64); 4] = [
        (Color::Red, Family::Wide, 0.17, 0.17),
        (Color::Green, Family::Wide, 0.19, 0.17),
        (Color::Yellow, Family::Narrow, 0.221, 0.25),
        (Color::Blue, Family::Narrow, 0.30, 0.27),
    ];

    table
        .into_iter()
        .map(|(color, family, larger, smaller)| {
            let per_type = BTreeMap::from([(family.larger(), larger), (family.smaller(), smaller)]);
            (color, per_type)
        })
        .collect()
}
