use std::path::PathBuf;
use thiserror::Error;

use crate::servant::Region;

/// A specialized `Result` type for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// The error type for everything that can abort a classification run.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Region {region} does not fit inside {width}x{height}")]
    InvalidGeometry {
        region: Region,
        width: u32,
        height: u32,
    },

    #[error("Template '{name}' has no pixels")]
    EmptyTemplate { name: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to write annotated image {path:?}: {source}")]
    Annotation {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl ClassifyError {
    /// Geometry error for a rectangle that must fit inside `width` x `height`.
    pub fn geometry(region: Region, width: u32, height: u32) -> Self {
        ClassifyError::InvalidGeometry {
            region,
            width,
            height,
        }
    }

    /// Check if this error came from bad input files rather than bad geometry
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClassifyError::Decode { .. } | ClassifyError::EmptyTemplate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_message_names_region_and_bounds() {
        let err = ClassifyError::geometry(Region::new(402, 150, 100, 150), 400, 300);
        assert_eq!(
            err.to_string(),
            "Region [402,150,100,150] does not fit inside 400x300"
        );
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_input_errors() {
        let empty = ClassifyError::EmptyTemplate {
            name: "caster".to_string(),
        };
        assert!(empty.is_input_error());

        let config = ClassifyError::InvalidConfig {
            reason: "slot_count must be at least 1".to_string(),
        };
        assert!(!config.is_input_error());
    }
}
