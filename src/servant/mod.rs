//! Servant class recognition for fixed-layout party screenshots
//!
//! The scene is downscaled, split into equally spaced servant slots, and the
//! class-indicator banner of each slot is matched against class templates in
//! priority order.

pub mod annotate;
pub mod class;
pub mod classifier;
pub mod config;
pub mod matcher;
pub mod portrait;
pub mod region;
pub mod template;

#[cfg(test)]
mod test_support;

// Re-export main types and functions
pub use annotate::{annotate_scene, save_annotated};
pub use class::ServantClass;
pub use classifier::{ServantClassifier, TrialReport};
pub use config::{MatchConfig, PipelinePaths};
pub use matcher::{MatchResult, TemplateMatcher};
pub use portrait::{Servant, ServantReport};
pub use region::{Region, RegionExtractor};
pub use template::{Template, TemplateSet};
