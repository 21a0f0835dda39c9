use clap::Parser;
use servant_class_match::{MatchConfig, PipelinePaths};
use std::path::PathBuf;

/// Classify the servants in a party screenshot by their class icons
#[derive(Debug, Parser)]
#[command(name = "servant-class-match", version, about, long_about = None)]
pub struct Args {
    /// Scene screenshot to classify
    #[arg(long, default_value = "scene.jpg")]
    pub scene: PathBuf,

    /// Directory holding caster.png, archer.png and lancer.png
    #[arg(long, default_value = "templates")]
    pub templates: PathBuf,

    /// Number of servant slots in the scene
    #[arg(long, default_value_t = 3)]
    pub slots: usize,

    /// Correlation a template must exceed to count as a match
    #[arg(long, default_value_t = 0.9)]
    pub threshold: f32,

    /// Repeat classification N times and report latency
    #[arg(long, value_name = "N")]
    pub trials: Option<usize>,

    /// Write the downscaled scene with borders, class areas and matches outlined
    #[arg(long, value_name = "PATH")]
    pub annotate: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug output for matching
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            debug_enabled: self.debug,
            ..MatchConfig::default()
        }
        .with_slot_count(self.slots)
        .with_threshold(self.threshold)
    }

    pub fn paths(&self) -> PipelinePaths {
        PipelinePaths::new(&self.scene, &self.templates)
    }
}
