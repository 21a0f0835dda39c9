//! Debug annotation of a classified scene

use super::portrait::Servant;
use crate::error::{ClassifyError, ClassifyResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use std::path::Path;

/// Outline colour for borders, class areas and matches
pub const ANNOTATION_RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Copy of `scene` with each servant border, class area and matched template outlined
pub fn annotate_scene(scene: &RgbImage, servants: &[Servant<'_>]) -> RgbImage {
    let mut annotated = scene.clone();

    for servant in servants {
        draw_hollow_rect_mut(&mut annotated, servant.region().to_rect(), ANNOTATION_RED);
        draw_hollow_rect_mut(
            &mut annotated,
            servant.class_region().to_rect(),
            ANNOTATION_RED,
        );
        if let Some(matched) = servant.match_region() {
            draw_hollow_rect_mut(&mut annotated, matched.to_rect(), ANNOTATION_RED);
        }
    }

    annotated
}

/// Write an annotated scene; the format follows the file extension
pub fn save_annotated(image: &RgbImage, path: &Path) -> ClassifyResult<()> {
    image.save(path).map_err(|source| ClassifyError::Annotation {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("🖼️  Annotated scene saved to {}", path.display());
    Ok(())
}
