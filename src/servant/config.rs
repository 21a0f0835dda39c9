//! Configuration for region extraction and template matching

use crate::error::{ClassifyError, ClassifyResult};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Scene and templates are downscaled by 1/resize_factor before any region math
    pub resize_factor: u32,
    /// Leading margin is scene_width / margin_factor
    pub margin_factor: u32,
    /// Servant width as a fraction of the scene width
    pub servant_width_factor: f64,
    /// Number of equally spaced servant slots
    pub slot_count: usize,
    /// Class-indicator width as (numerator, denominator) of the servant width
    pub class_width_ratio: (u32, u32),
    /// Class-indicator height as (numerator, denominator) of the servant height
    pub class_height_ratio: (u32, u32),
    /// A template matches only when the best correlation is strictly above this
    pub match_threshold: f32,
    /// Debug mode flag
    pub debug_enabled: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            resize_factor: 2,
            margin_factor: 160,
            servant_width_factor: 0.25,
            slot_count: 3,
            class_width_ratio: (7, 20),
            class_height_ratio: (2, 7),
            match_threshold: 0.9,
            debug_enabled: false,
        }
    }
}

impl MatchConfig {
    /// Reject values that would make the geometry or the threshold meaningless
    pub fn validate(&self) -> ClassifyResult<()> {
        let invalid = |reason: &str| {
            Err(ClassifyError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.resize_factor == 0 {
            return invalid("resize_factor must be at least 1");
        }
        if self.margin_factor == 0 {
            return invalid("margin_factor must be at least 1");
        }
        if !self.servant_width_factor.is_finite() || self.servant_width_factor <= 0.0 {
            return invalid("servant_width_factor must be a positive number");
        }
        if self.slot_count == 0 {
            return invalid("slot_count must be at least 1");
        }
        for (name, (num, den)) in [
            ("class_width_ratio", self.class_width_ratio),
            ("class_height_ratio", self.class_height_ratio),
        ] {
            if num == 0 || den == 0 {
                return Err(ClassifyError::InvalidConfig {
                    reason: format!("{name} must have non-zero terms, got {num}/{den}"),
                });
            }
        }
        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return invalid("match_threshold must lie in [-1, 1]");
        }

        Ok(())
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_slot_count(mut self, slot_count: usize) -> Self {
        self.slot_count = slot_count;
        self
    }
}

/// Where the driver finds its inputs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePaths {
    pub scene: PathBuf,
    pub templates_dir: PathBuf,
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self {
            scene: PathBuf::from("scene.jpg"),
            templates_dir: PathBuf::from("templates"),
        }
    }
}

impl PipelinePaths {
    pub fn new(scene: impl Into<PathBuf>, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            scene: scene.into(),
            templates_dir: templates_dir.into(),
        }
    }

    /// Template file for a class stem, e.g. `templates/caster.png`
    pub fn template_path(&self, file_stem: &str) -> PathBuf {
        template_path_in(&self.templates_dir, file_stem)
    }
}

pub(crate) fn template_path_in(dir: &Path, file_stem: &str) -> PathBuf {
    dir.join(format!("{file_stem}.png"))
}
