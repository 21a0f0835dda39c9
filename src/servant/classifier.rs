//! Scene classification pipeline: extract slots, classify each, time repeated runs

use super::class::ServantClass;
use super::config::{MatchConfig, PipelinePaths};
use super::matcher::TemplateMatcher;
use super::portrait::{Servant, ServantReport};
use super::region::RegionExtractor;
use super::template::TemplateSet;
use crate::error::{ClassifyError, ClassifyResult};
use image::RgbImage;
use std::path::Path;
use std::time::{Duration, Instant};

/// Timing of repeated classification runs over the same scene
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub durations: Vec<Duration>,
    /// Results of the last trial (every trial produces the same ones)
    pub servants: Vec<ServantReport>,
}

impl TrialReport {
    pub fn average(&self) -> Duration {
        if self.durations.is_empty() {
            return Duration::ZERO;
        }
        self.durations.iter().sum::<Duration>() / self.durations.len() as u32
    }
}

/// Owns the geometry, matcher and templates for a run
pub struct ServantClassifier {
    extractor: RegionExtractor,
    matcher: TemplateMatcher,
    templates: TemplateSet,
}

impl ServantClassifier {
    pub fn new(config: MatchConfig, templates: TemplateSet) -> ClassifyResult<Self> {
        let extractor = RegionExtractor::new(&config)?;
        let matcher = TemplateMatcher::new(&config);
        Ok(Self {
            extractor,
            matcher,
            templates,
        })
    }

    /// Load the default template order (Caster, Archer, Lancer) from `paths`
    pub fn load(config: MatchConfig, paths: &PipelinePaths) -> ClassifyResult<Self> {
        let extractor = RegionExtractor::new(&config)?;
        let templates = TemplateSet::load_from_directory(
            &paths.templates_dir,
            &ServantClass::TEMPLATE_ORDER,
            &extractor,
        )?;
        Self::new(config, templates)
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Decode a scene file and downscale it for region math
    pub fn load_scene(&self, path: &Path) -> ClassifyResult<RgbImage> {
        let decoded = image::open(path).map_err(|source| ClassifyError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = self.prepare_scene(&decoded.to_rgb8())?;
        log::info!(
            "📷 Scene {} loaded ({}x{} after downscale)",
            path.display(),
            scene.width(),
            scene.height()
        );
        Ok(scene)
    }

    /// Downscale a full-resolution scene by the configured factor
    pub fn prepare_scene(&self, scene: &RgbImage) -> ClassifyResult<RgbImage> {
        self.extractor.downscale(scene)
    }

    /// Classify every slot of an already downscaled scene, left to right
    pub fn classify_scene<'a>(&self, scene: &'a RgbImage) -> ClassifyResult<Vec<Servant<'a>>> {
        let regions = self
            .extractor
            .servant_regions(scene.width(), scene.height())?;

        regions
            .into_iter()
            .enumerate()
            .map(|(index, region)| {
                let servant = Servant::new(
                    scene,
                    index,
                    region,
                    &self.extractor,
                    &self.matcher,
                    &self.templates,
                )?;
                log::debug!("{} -> {:?}", servant.label(), servant.match_result());
                Ok(servant)
            })
            .collect()
    }

    /// Classify and drop the borrowed views, keeping owned reports
    pub fn classify_reports(&self, scene: &RgbImage) -> ClassifyResult<Vec<ServantReport>> {
        Ok(self
            .classify_scene(scene)?
            .iter()
            .map(Servant::report)
            .collect())
    }

    /// Run the classification `trials` times, timing each run
    pub fn run_trials(&self, scene: &RgbImage, trials: usize) -> ClassifyResult<TrialReport> {
        if trials == 0 {
            return Err(ClassifyError::InvalidConfig {
                reason: "trial count must be at least 1".to_string(),
            });
        }

        let mut durations = Vec::with_capacity(trials);
        let mut servants = Vec::new();
        for trial in 0..trials {
            let start = Instant::now();
            servants = self.classify_reports(scene)?;
            let elapsed = start.elapsed();
            log::info!(
                "⏱️  Trial {}/{}: {:.3}ms",
                trial + 1,
                trials,
                elapsed.as_secs_f64() * 1000.0
            );
            durations.push(elapsed);
        }

        Ok(TrialReport {
            durations,
            servants,
        })
    }
}
