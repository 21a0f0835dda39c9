//! Fixed-ratio region geometry for servant slots and their class indicators

use super::config::MatchConfig;
use crate::error::{ClassifyError, ClassifyResult};
use image::imageops::{self, FilterType};
use image::{RgbImage, SubImage};
use imageproc::rect::Rect;
use serde::Serialize;
use std::fmt;

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole `width` x `height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Non-empty and entirely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.is_valid()
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }

    /// Check if this region contains a point
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x - self.x < self.width && y >= self.y && y - self.y < self.height
    }

    /// Same size, moved by the origin of a parent region
    pub fn offset_by(&self, parent: &Region) -> Region {
        Region::new(parent.x + self.x, parent.y + self.y, self.width, self.height)
    }

    /// Drawing rectangle for imageproc
    pub fn to_rect(&self) -> Rect {
        Rect::at(self.x as i32, self.y as i32).of_size(self.width.max(1), self.height.max(1))
    }

    /// Borrow the pixels under this region, failing if it leaves the image
    pub fn view<'a>(&self, image: &'a RgbImage) -> ClassifyResult<SubImage<&'a RgbImage>> {
        if !self.fits_within(image.width(), image.height()) {
            return Err(ClassifyError::geometry(*self, image.width(), image.height()));
        }
        Ok(imageops::crop_imm(image, self.x, self.y, self.width, self.height))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}

/// Computes servant slots and class-indicator areas from fixed ratios
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    resize_factor: u32,
    margin_factor: u32,
    servant_width_factor: f64,
    slot_count: usize,
    class_width_ratio: (u32, u32),
    class_height_ratio: (u32, u32),
}

impl RegionExtractor {
    pub fn new(config: &MatchConfig) -> ClassifyResult<Self> {
        config.validate()?;
        Ok(Self {
            resize_factor: config.resize_factor,
            margin_factor: config.margin_factor,
            servant_width_factor: config.servant_width_factor,
            slot_count: config.slot_count,
            class_width_ratio: config.class_width_ratio,
            class_height_ratio: config.class_height_ratio,
        })
    }

    pub fn resize_factor(&self) -> u32 {
        self.resize_factor
    }

    /// Downscale an image by `1/resize_factor` on both axes (floor division).
    ///
    /// Templates go through the same call so they stay compatible with the
    /// class areas cut from the downscaled scene.
    pub fn downscale(&self, image: &RgbImage) -> ClassifyResult<RgbImage> {
        let width = image.width() / self.resize_factor;
        let height = image.height() / self.resize_factor;
        if width == 0 || height == 0 {
            return Err(ClassifyError::geometry(
                Region::new(0, 0, width, height),
                image.width(),
                image.height(),
            ));
        }
        if self.resize_factor == 1 {
            return Ok(image.clone());
        }
        Ok(imageops::resize(image, width, height, FilterType::Triangle))
    }

    /// Rectangle of servant slot `index` inside a (downscaled) scene
    pub fn servant_region(
        &self,
        scene_width: u32,
        scene_height: u32,
        index: usize,
    ) -> ClassifyResult<Region> {
        let margin = u64::from(scene_width / self.margin_factor);
        let servant_width = (f64::from(scene_width) * self.servant_width_factor).floor() as u64;
        let left = margin + index as u64 * servant_width;
        let top = scene_height / 2;
        let height = scene_height / 2;

        let region = Region::new(
            u32::try_from(left).unwrap_or(u32::MAX),
            top,
            u32::try_from(servant_width).unwrap_or(u32::MAX),
            height,
        );
        if !region.fits_within(scene_width, scene_height) {
            return Err(ClassifyError::geometry(region, scene_width, scene_height));
        }
        Ok(region)
    }

    /// All servant slots, left to right
    pub fn servant_regions(&self, scene_width: u32, scene_height: u32) -> ClassifyResult<Vec<Region>> {
        (0..self.slot_count)
            .map(|index| self.servant_region(scene_width, scene_height, index))
            .collect()
    }

    /// Class-indicator rectangle relative to a servant region's top-left corner.
    ///
    /// Anchored at the bottom-left of the region.
    pub fn class_region(&self, region_width: u32, region_height: u32) -> ClassifyResult<Region> {
        let (width_num, width_den) = self.class_width_ratio;
        let (height_num, height_den) = self.class_height_ratio;
        let class_width = (region_width / width_den).saturating_mul(width_num);
        let class_height = (region_height / height_den).saturating_mul(height_num);

        let region = Region::new(
            0,
            region_height.saturating_sub(class_height),
            class_width,
            class_height,
        );
        if !region.fits_within(region_width, region_height) {
            return Err(ClassifyError::geometry(region, region_width, region_height));
        }
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> RegionExtractor {
        RegionExtractor::new(&MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_servant_region_reference_geometry() {
        // 800x600 downscaled by 2 is 400x300
        let extractor = extractor();
        let scene = RgbImage::new(800, 600);
        let small = extractor.downscale(&scene).unwrap();
        assert_eq!((small.width(), small.height()), (400, 300));

        let slot0 = extractor.servant_region(400, 300, 0).unwrap();
        assert_eq!(slot0, Region::new(2, 150, 100, 150));
    }

    #[test]
    fn test_slots_are_laid_out_without_gaps() {
        let regions = extractor().servant_regions(400, 300).unwrap();

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1], Region::new(102, 150, 100, 150));
        assert_eq!(regions[2], Region::new(202, 150, 100, 150));
        for pair in regions.windows(2) {
            assert_eq!(pair[0].x + pair[0].width, pair[1].x);
        }
    }

    #[test]
    fn test_margin_truncates() {
        // 319 / 160 = 1, floor(319 * 0.25) = 79
        let region = extractor().servant_region(319, 201, 1).unwrap();
        assert_eq!(region, Region::new(80, 100, 79, 100));
    }

    #[test]
    fn test_class_region_reference_geometry() {
        let class = extractor().class_region(100, 150).unwrap();
        assert_eq!(class, Region::new(0, 108, 35, 42));
    }

    #[test]
    fn test_slot_outside_scene_is_invalid_geometry() {
        let config = MatchConfig::default().with_slot_count(5);
        let extractor = RegionExtractor::new(&config).unwrap();

        // slot 4 starts at 2 + 400 = 402 > 400
        let err = extractor.servant_regions(400, 300).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_degenerate_scene_is_invalid_geometry() {
        let extractor = extractor();
        assert!(matches!(
            extractor.servant_region(400, 1, 0),
            Err(ClassifyError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            extractor.class_region(10, 6),
            Err(ClassifyError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            extractor.downscale(&RgbImage::new(1, 40)),
            Err(ClassifyError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_view_checks_bounds() {
        let image = RgbImage::new(50, 40);
        assert!(Region::new(10, 10, 40, 30).view(&image).is_ok());
        assert!(Region::new(11, 10, 40, 30).view(&image).is_err());
        assert!(Region::new(0, 0, 0, 10).view(&image).is_err());
    }

    #[test]
    fn test_contains_point_and_offset() {
        let parent = Region::new(100, 50, 80, 60);
        let child = Region::new(0, 40, 20, 20).offset_by(&parent);

        assert_eq!(child, Region::new(100, 90, 20, 20));
        assert!(child.contains_point(100, 90));
        assert!(child.contains_point(119, 109));
        assert!(!child.contains_point(120, 109));
        assert!(!child.contains_point(99, 95));
    }
}
