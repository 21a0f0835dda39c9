//! A servant portrait cut from the scene, classified once at construction

use super::class::ServantClass;
use super::matcher::{MatchResult, TemplateMatcher};
use super::region::{Region, RegionExtractor};
use super::template::TemplateSet;
use crate::error::ClassifyResult;
use image::{RgbImage, SubImage};
use serde::Serialize;
use std::fmt;

pub struct Servant<'a> {
    index: usize,
    view: SubImage<&'a RgbImage>,
    region: Region,
    /// Class-indicator area relative to `region`
    class_area: Region,
    class: ServantClass,
    matched: Option<MatchResult>,
}

impl<'a> Servant<'a> {
    /// Cut slot `index` out of `scene` and classify its class-indicator area.
    ///
    /// The result is cached; nothing re-runs matching afterwards.
    pub fn new(
        scene: &'a RgbImage,
        index: usize,
        region: Region,
        extractor: &RegionExtractor,
        matcher: &TemplateMatcher,
        templates: &TemplateSet,
    ) -> ClassifyResult<Self> {
        let view = region.view(scene)?;
        let class_area = extractor.class_region(region.width, region.height)?;
        let class_pixels = class_area.offset_by(&region).view(scene)?.to_image();

        let (class, matched) = matcher.classify_with_match(&class_pixels, templates)?;

        Ok(Self {
            index,
            view,
            region,
            class_area,
            class,
            matched,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Display name, 1-based: "Servant 1", "Servant 2", ...
    pub fn label(&self) -> String {
        format!("Servant {}", self.index + 1)
    }

    pub fn class(&self) -> ServantClass {
        self.class
    }

    /// Portrait rectangle in scene coordinates
    pub fn region(&self) -> Region {
        self.region
    }

    /// Class-indicator rectangle in scene coordinates
    pub fn class_region(&self) -> Region {
        self.class_area.offset_by(&self.region)
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        self.matched.as_ref()
    }

    /// Matched template rectangle in scene coordinates
    pub fn match_region(&self) -> Option<Region> {
        let class_region = self.class_region();
        self.matched
            .as_ref()
            .map(|m| m.region.offset_by(&class_region))
    }

    /// Borrowed portrait pixels
    pub fn view(&self) -> &SubImage<&'a RgbImage> {
        &self.view
    }

    pub fn report(&self) -> ServantReport {
        ServantReport {
            slot: self.index + 1,
            label: self.label(),
            class: self.class,
            score: self.matched.as_ref().map(|m| m.score),
            region: self.region,
        }
    }
}

impl fmt::Debug for Servant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Servant")
            .field("index", &self.index)
            .field("region", &self.region)
            .field("class_area", &self.class_area)
            .field("class", &self.class)
            .field("matched", &self.matched)
            .finish()
    }
}

/// Owned, serializable summary of one classified slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServantReport {
    pub slot: usize,
    pub label: String,
    pub class: ServantClass,
    pub score: Option<f32>,
    pub region: Region,
}

impl fmt::Display for ServantReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Class: {}", self.label, self.class)
    }
}
