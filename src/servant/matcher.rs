//! Template matching implementation
//!
//! Zero-mean normalized cross-correlation (correlation coefficient) over every
//! offset where the template fits inside the searched region. Window sums come
//! from integral images; the cross term is accumulated exactly in integers, so
//! identical inputs score 1.0.

use super::class::ServantClass;
use super::config::MatchConfig;
use super::region::Region;
use super::template::{Template, TemplateSet};
use crate::error::{ClassifyError, ClassifyResult};
use image::{Rgb, RgbImage};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, integral_squared_image};
use serde::Serialize;

/// Best alignment of one template inside a searched region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub class: ServantClass,
    /// Matched rectangle, relative to the searched region
    pub region: Region,
    /// Correlation score in [-1, 1]
    pub score: f32,
}

/// Per-channel sums of a template, precomputed once per match call
struct TemplateStats {
    sums: [i128; 3],
    /// n * sum(T^2) - sum(T)^2 over all channels
    spread: i128,
}

impl TemplateStats {
    fn new(template: &RgbImage) -> Self {
        let n = i128::from(template.width()) * i128::from(template.height());
        let mut sums = [0i128; 3];
        let mut squares = [0i128; 3];
        for pixel in template.pixels() {
            for c in 0..3 {
                let v = i128::from(pixel[c]);
                sums[c] += v;
                squares[c] += v * v;
            }
        }
        let spread = (0..3).map(|c| n * squares[c] - sums[c] * sums[c]).sum();
        Self { sums, spread }
    }
}

/// Decides whether a region shows a template, and classifies regions
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    threshold: f32,
    debug: bool,
}

impl TemplateMatcher {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            threshold: config.match_threshold,
            debug: config.debug_enabled,
        }
    }

    /// Highest-scoring alignment of `template` inside `region`.
    ///
    /// Fails with `EmptyTemplate` for a zero-sized template and with
    /// `InvalidGeometry` when the template does not fit in the region.
    pub fn best_match(&self, region: &RgbImage, template: &Template) -> ClassifyResult<MatchResult> {
        let templ = template.image();
        if templ.width() == 0 || templ.height() == 0 {
            return Err(ClassifyError::EmptyTemplate {
                name: template.name.clone(),
            });
        }
        if templ.width() > region.width() || templ.height() > region.height() {
            return Err(ClassifyError::geometry(
                Region::full(templ.width(), templ.height()),
                region.width(),
                region.height(),
            ));
        }

        let (x, y, score) = best_correlation(region, templ);

        if self.debug {
            log::debug!(
                "🔍 '{}' {}x{} in {}x{}: best {:.4} at ({},{})",
                template.name,
                templ.width(),
                templ.height(),
                region.width(),
                region.height(),
                score,
                x,
                y
            );
        }

        Ok(MatchResult {
            class: template.class,
            region: Region::new(x, y, templ.width(), templ.height()),
            score,
        })
    }

    /// The best alignment, if it scores strictly above the threshold
    pub fn find(&self, region: &RgbImage, template: &Template) -> ClassifyResult<Option<MatchResult>> {
        let best = self.best_match(region, template)?;
        Ok((best.score > self.threshold).then_some(best))
    }

    pub fn matches(&self, region: &RgbImage, template: &Template) -> ClassifyResult<bool> {
        Ok(self.find(region, template)?.is_some())
    }

    /// Class of the first template (in set order) that matches, with its match.
    ///
    /// `Unknown` and no match when nothing clears the threshold.
    pub fn classify_with_match(
        &self,
        region: &RgbImage,
        templates: &TemplateSet,
    ) -> ClassifyResult<(ServantClass, Option<MatchResult>)> {
        for template in templates.iter() {
            if let Some(found) = self.find(region, template)? {
                return Ok((template.class, Some(found)));
            }
        }
        Ok((ServantClass::Unknown, None))
    }

    pub fn classify(&self, region: &RgbImage, templates: &TemplateSet) -> ClassifyResult<ServantClass> {
        Ok(self.classify_with_match(region, templates)?.0)
    }
}

/// Sum of a channel over the window [x, x+w) x [y, y+h) of a padded integral image
fn window_sum(integral: &Image<Rgb<u64>>, x: u32, y: u32, w: u32, h: u32, c: usize) -> i128 {
    let at = |px: u32, py: u32| i128::from(integral.get_pixel(px, py)[c]);
    at(x + w, y + h) - at(x, y + h) - at(x + w, y) + at(x, y)
}

/// Exhaustive zero-mean NCC search; returns (x, y, score) of the maximum.
///
/// Ties keep the first offset in row-major order. A flat window scored
/// against a flat template counts as a perfect match, any other flat pairing
/// scores 0.
fn best_correlation(image: &RgbImage, template: &RgbImage) -> (u32, u32, f32) {
    let (tw, th) = template.dimensions();
    let n = i128::from(tw) * i128::from(th);
    let stats = TemplateStats::new(template);

    let sums: Image<Rgb<u64>> = integral_image::<_, u64>(image);
    let squares: Image<Rgb<u64>> = integral_squared_image::<_, u64>(image);

    let mut best = (0, 0, f32::MIN);
    for y in 0..=(image.height() - th) {
        for x in 0..=(image.width() - tw) {
            let mut cross = 0i128;
            for py in 0..th {
                for px in 0..tw {
                    let i = image.get_pixel(x + px, y + py);
                    let t = template.get_pixel(px, py);
                    for c in 0..3 {
                        cross += i128::from(i[c]) * i128::from(t[c]);
                    }
                }
            }

            let mut numerator = n * cross;
            let mut spread = 0i128;
            for c in 0..3 {
                let s = window_sum(&sums, x, y, tw, th, c);
                let q = window_sum(&squares, x, y, tw, th, c);
                numerator -= stats.sums[c] * s;
                spread += n * q - s * s;
            }

            let score = match (spread == 0, stats.spread == 0) {
                (true, true) => 1.0,
                (true, false) | (false, true) => 0.0,
                (false, false) => {
                    let denominator = (spread as f64).sqrt() * (stats.spread as f64).sqrt();
                    ((numerator as f64) / denominator).clamp(-1.0, 1.0) as f32
                }
            };

            if score > best.2 {
                best = (x, y, score);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servant::test_support::noise;

    fn template(class: ServantClass, image: RgbImage) -> Template {
        Template::from_image(class, class.file_stem(), image).unwrap()
    }

    fn matcher() -> TemplateMatcher {
        TemplateMatcher::new(&MatchConfig::default())
    }

    #[test]
    fn test_self_match_is_perfect() {
        let image = noise(12, 9, 3);
        let templ = template(ServantClass::Caster, image.clone());

        let best = matcher().best_match(&image, &templ).unwrap();
        assert!((best.score - 1.0).abs() < 1e-6, "got {}", best.score);
        assert_eq!(best.region, Region::new(0, 0, 12, 9));
        assert!(matcher().matches(&image, &templ).unwrap());
    }

    #[test]
    fn test_finds_embedded_template_location() {
        let mut image = noise(40, 30, 1);
        let patch = noise(8, 6, 9);
        image::imageops::replace(&mut image, &patch, 13, 17);

        let best = matcher()
            .best_match(&image, &template(ServantClass::Archer, patch))
            .unwrap();
        assert_eq!((best.region.x, best.region.y), (13, 17));
        assert!(best.score > 0.999);
    }

    #[test]
    fn test_score_ignores_brightness_offset() {
        let patch = noise(10, 10, 5);
        let brighter = RgbImage::from_fn(10, 10, |x, y| {
            let p = patch.get_pixel(x, y);
            Rgb([p[0] / 2 + 40, p[1] / 2 + 40, p[2] / 2 + 40])
        });

        let best = matcher()
            .best_match(&brighter, &template(ServantClass::Lancer, patch))
            .unwrap();
        assert!(best.score > 0.99, "got {}", best.score);
    }

    #[test]
    fn test_template_larger_than_region_is_invalid_geometry() {
        let region = noise(10, 10, 0);
        for (w, h) in [(11, 5), (5, 11)] {
            let templ = template(ServantClass::Caster, noise(w, h, 0));
            assert!(matches!(
                matcher().matches(&region, &templ),
                Err(ClassifyError::InvalidGeometry { .. })
            ));
        }
    }

    #[test]
    fn test_flat_inputs() {
        let flat = RgbImage::from_pixel(6, 6, Rgb([90, 90, 90]));
        let flat_templ = template(ServantClass::Caster, RgbImage::from_pixel(3, 3, Rgb([5, 5, 5])));
        let textured_templ = template(ServantClass::Archer, noise(3, 3, 2));

        assert_eq!(matcher().best_match(&flat, &flat_templ).unwrap().score, 1.0);
        assert_eq!(matcher().best_match(&flat, &textured_templ).unwrap().score, 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let image = noise(6, 6, 4);
        let templ = template(ServantClass::Caster, image.clone());
        let config = MatchConfig::default().with_threshold(1.0);

        assert!(!TemplateMatcher::new(&config).matches(&image, &templ).unwrap());
    }

    #[test]
    fn test_classify_falls_through_to_unknown() {
        let region = noise(20, 20, 11);
        let set = TemplateSet::new()
            .with(template(ServantClass::Caster, noise(5, 5, 50)))
            .with(template(ServantClass::Archer, noise(5, 5, 60)));

        let (class, found) = matcher().classify_with_match(&region, &set).unwrap();
        assert_eq!(class, ServantClass::Unknown);
        assert!(found.is_none());
    }

    #[test]
    fn test_classify_empty_set_is_unknown() {
        let class = matcher()
            .classify(&noise(4, 4, 0), &TemplateSet::new())
            .unwrap();
        assert_eq!(class, ServantClass::Unknown);
    }
}
