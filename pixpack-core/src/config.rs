//! Configuration for encode and decode batches

use crate::constants::IMAGE_EXTENSION;
use crate::error::PackError;
use serde::{Deserialize, Serialize};

/// Options shared by [`crate::batch::encode`] and [`crate::batch::decode`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Follow symbolic links while walking input directories.
    /// When off, links are ignored.
    pub follow_links: bool,

    /// Extension matched (case-insensitively) when a decode input is a
    /// directory of images
    pub image_extension: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            image_extension: IMAGE_EXTENSION.to_string(),
        }
    }
}

impl PackConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PackError> {
        let ext = self.image_extension.as_str();
        let has_separator = ext.contains(|c: char| c == '/' || c == '\\');
        if ext.is_empty() || ext.starts_with('.') || has_separator {
            return Err(PackError::Config(format!(
                "image extension must be a bare extension like \"png\", got {:?}",
                ext
            )));
        }
        Ok(())
    }

    /// Whether `path` carries the configured image extension
    pub fn is_image_path(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.image_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_is_valid() {
        let config = PackConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.follow_links);
        assert_eq!(config.image_extension, "png");
    }

    #[test]
    fn test_rejects_bad_extension() {
        for ext in ["", ".png", "a/b"] {
            let config = PackConfig {
                image_extension: ext.to_string(),
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(PackError::Config(_))));
        }
    }

    #[test]
    fn test_is_image_path() {
        let config = PackConfig::default();
        assert!(config.is_image_path(Path::new("a/b.png")));
        assert!(config.is_image_path(Path::new("B.PNG")));
        assert!(!config.is_image_path(Path::new("b.jpg")));
        assert!(!config.is_image_path(Path::new("png")));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PackConfig = serde_json::from_str(r#"{"follow_links": true}"#).unwrap();
        assert!(config.follow_links);
        assert_eq!(config.image_extension, "png");
    }
}
