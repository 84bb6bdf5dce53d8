//! Template loading utilities

use super::{Template, TemplateSet};
use crate::utils::image::ImageUtils;
use crate::Result;
use brick_core::{Color, ShapeType};
use log::{debug, warn};
use opencv::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Finds `{type}_{colour}.{ext}` reference images in a list of directories
pub struct TemplateLoader {
    template_dirs: Vec<PathBuf>,
    supported_extensions: Vec<String>,
}

impl TemplateLoader {
    /// Create new template loader
    pub fn new() -> Self {
        Self::with_extensions(vec![
            "png".to_string(),
            "jpg".to_string(),
            "jpeg".to_string(),
            "bmp".to_string(),
        ])
    }

    pub fn with_extensions(supported_extensions: Vec<String>) -> Self {
        Self {
            template_dirs: Vec::new(),
            supported_extensions,
        }
    }

    /// Add template directory
    pub fn add_template_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.template_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// File stem for a pair, e.g. `2x4_red`
    pub fn stem_for(shape_type: ShapeType, color: Color) -> String {
        format!("{}_{}", shape_type.label(), color.file_stem())
    }

    /// Load the template for one pair.
    ///
    /// Extensions are tried in order; an unreadable or empty file is skipped
    /// in favour of the next one. Nothing usable yields `Ok(None)`.
    pub fn load_template(&self, shape_type: ShapeType, color: Color) -> Result<Option<Template>> {
        let stem = Self::stem_for(shape_type, color);

        for ext in &self.supported_extensions {
            let candidate = format!("{}.{}", stem, ext);
            let Some(path) = self.find_template_file(&candidate)? else {
                continue;
            };

            let image = match ImageUtils::load_grayscale(&path) {
                Ok(image) => image,
                Err(e) => {
                    warn!("Unreadable template {:?}: {:#}", path, e);
                    continue;
                }
            };
            if image.empty() {
                warn!("Empty template {:?}", path);
                continue;
            }

            debug!("Loaded template {} from {:?}", stem, path);
            return Ok(Some(
                Template::new(shape_type, color, image)
                    .with_metadata("path".to_string(), path.to_string_lossy().to_string()),
            ));
        }

        Ok(None)
    }

    /// Load every template the colour families call for
    pub fn load_set(&self) -> Result<TemplateSet> {
        let mut set = TemplateSet::new();

        for color in Color::ALL {
            for shape_type in color.family().members() {
                match self.load_template(shape_type, color)? {
                    Some(template) => set.insert(template),
                    None => debug!("No template for {}", Self::stem_for(shape_type, color)),
                }
            }
        }

        debug!("Template set holds {} image(s)", set.len());
        Ok(set)
    }

    /// Find template file in directories
    fn find_template_file(&self, candidate: &str) -> Result<Option<PathBuf>> {
        for dir in &self.template_dirs {
            let path = dir.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }

            // Case-insensitive search
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    let file_name = entry.file_name();
                    let file_name_str = file_name.to_string_lossy();

                    if file_name_str.to_lowercase() == candidate.to_lowercase() {
                        return Ok(Some(entry.path()));
                    }
                }
            }
        }

        Ok(None)
    }
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}
