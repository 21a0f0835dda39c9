//! Class templates and their priority-ordered collection

use super::class::ServantClass;
use super::config::template_path_in;
use super::region::RegionExtractor;
use crate::error::{ClassifyError, ClassifyResult};
use image::RgbImage;
use std::path::Path;

/// Templates bigger than this on either axis are almost certainly not a
/// class icon and make every correlation pass slow.
const LARGE_TEMPLATE_SIDE: u32 = 500;

/// A reference image for one servant class, immutable after load
#[derive(Debug, Clone)]
pub struct Template {
    pub class: ServantClass,
    pub name: String,
    image: RgbImage,
}

impl Template {
    /// Wrap an already prepared image. Empty images are rejected.
    pub fn from_image(
        class: ServantClass,
        name: impl Into<String>,
        image: RgbImage,
    ) -> ClassifyResult<Self> {
        let name = name.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(ClassifyError::EmptyTemplate { name });
        }
        if image.width() > LARGE_TEMPLATE_SIDE || image.height() > LARGE_TEMPLATE_SIDE {
            log::warn!(
                "⚠️ Large template '{}' ({}x{}) - matching may be slow",
                name,
                image.width(),
                image.height()
            );
        }
        Ok(Self { class, name, image })
    }

    /// Decode a template file and downscale it the same way as the scene
    pub fn load(
        class: ServantClass,
        path: &Path,
        extractor: &RegionExtractor,
    ) -> ClassifyResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        if ServantClass::from_file_stem(&name) != Some(class) {
            log::warn!("⚠️ Template file '{}' is used for class {}", name, class);
        }

        let decoded = image::open(path).map_err(|source| ClassifyError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = decoded.to_rgb8();

        let factor = extractor.resize_factor();
        if rgb.width() / factor == 0 || rgb.height() / factor == 0 {
            return Err(ClassifyError::EmptyTemplate { name });
        }
        let image = extractor.downscale(&rgb)?;

        log::debug!(
            "📐 Template '{}' loaded as {} ({}x{} -> {}x{})",
            name,
            class,
            rgb.width(),
            rgb.height(),
            image.width(),
            image.height()
        );

        Self::from_image(class, name, image)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Templates in matching priority order; the first match wins
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template at the lowest priority
    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn with(mut self, template: Template) -> Self {
        self.push(template);
        self
    }

    /// Load `<dir>/<class>.png` for each class, keeping the given order.
    ///
    /// A missing or undecodable file aborts the whole load.
    pub fn load_from_directory(
        directory: &Path,
        classes: &[ServantClass],
        extractor: &RegionExtractor,
    ) -> ClassifyResult<Self> {
        let mut set = Self::new();
        for &class in classes {
            let path = template_path_in(directory, &class.file_stem());
            set.push(Template::load(class, &path, extractor)?);
        }
        log::info!(
            "📦 Loaded {} templates from {}",
            set.len(),
            directory.display()
        );
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, class: ServantClass) -> Option<&Template> {
        self.templates.iter().find(|t| t.class == class)
    }

    /// Classes in priority order
    pub fn classes(&self) -> Vec<ServantClass> {
        self.templates.iter().map(|t| t.class).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_empty_template_rejected() {
        let err = Template::from_image(ServantClass::Caster, "caster", RgbImage::new(0, 5))
            .unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyTemplate { ref name } if name == "caster"));
    }

    #[test]
    fn test_template_set_keeps_insertion_order() {
        let image = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let set = TemplateSet::new()
            .with(Template::from_image(ServantClass::Lancer, "lancer", image.clone()).unwrap())
            .with(Template::from_image(ServantClass::Caster, "caster", image.clone()).unwrap())
            .with(Template::from_image(ServantClass::Archer, "archer", image).unwrap());

        assert_eq!(
            set.classes(),
            vec![
                ServantClass::Lancer,
                ServantClass::Caster,
                ServantClass::Archer
            ]
        );
        assert_eq!(set.get(ServantClass::Caster).unwrap().name, "caster");
        assert!(set.get(ServantClass::Saber).is_none());
    }
}
