//! Detection configuration

use crate::classify::ClassifierConfig;
use crate::error::ConfigError;
use crate::geometry::GeometryNormalizer;
use crate::segmentation::{ColorProfile, HsvRange};
use crate::template::TemplateConfig;
use crate::Result;
use anyhow::Context;
use brick_core::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub segmentation: SegmentationConfig,
    /// Shapes whose ROI area does not exceed this are dropped
    pub min_pixel_area: i64,
    /// Context kept around each ROI when it is re-cut
    pub roi_margin: i32,
    pub geometry: GeometryNormalizer,
    pub classifier: ClassifierConfig,
    pub template_config: TemplateConfig,
    pub visualization: VisualizationConfig,
}

/// Foreground pass plus one pass per colour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub foreground: ColorProfile,
    pub colors: BTreeMap<Color, ColorProfile>,
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub draw_bboxes: bool,
    pub draw_labels: bool,
    pub draw_centers: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        let colors = BTreeMap::from([
            (Color::Blue, ColorProfile::single(3, [100, 100, 0], [170, 255, 255])),
            (Color::Green, ColorProfile::single(3, [50, 27, 0], [100, 255, 131])),
            (
                Color::Red,
                ColorProfile::new(
                    1,
                    vec![
                        HsvRange::new([0, 0, 0], [10, 255, 255]),
                        HsvRange::new([140, 0, 0], [255, 255, 255]),
                    ],
                ),
            ),
            (Color::Yellow, ColorProfile::single(3, [11, 50, 0], [30, 255, 255])),
        ]);

        Self {
            foreground: ColorProfile::single(5, [0, 75, 0], [255, 255, 255]),
            colors,
        }
    }
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            draw_bboxes: true,
            draw_labels: true,
            draw_centers: true,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            min_pixel_area: 750,
            roi_margin: 25,
            geometry: GeometryNormalizer::default(),
            classifier: ClassifierConfig::default(),
            template_config: TemplateConfig::default(),
            visualization: VisualizationConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Read a JSON configuration; absent fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write config: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Replace the template search path
    pub fn with_template_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.template_config.template_dirs = dirs;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.segmentation.foreground.validate("foreground")?;
        for color in Color::ALL {
            let profile = self
                .segmentation
                .colors
                .get(&color)
                .ok_or(ConfigError::MissingColor(color))?;
            profile.validate(color.file_stem())?;
        }

        if self.roi_margin < 0 {
            return Err(ConfigError::NegativeMargin(self.roi_margin));
        }

        for (color, per_type) in &self.template_config.thresholds {
            for (shape_type, value) in per_type {
                if !(-1.0..=1.0).contains(value) {
                    return Err(ConfigError::ThresholdOutOfRange {
                        color: color.file_stem(),
                        shape_type: *shape_type,
                        value: *value,
                    });
                }
            }
        }

        self.classifier.validate()
    }
}
