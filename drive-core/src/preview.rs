//! Preview classification
//!
//! Pure name-based classification; reading and rendering live in the
//! storage crate. The extension sets are configurable, with defaults
//! matching the formats the store renders inline.

use serde::{Deserialize, Serialize};

use crate::name::extension_of;

/// Default text-like extensions, rendered inline as bounded text.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &["txt", "md", "log"];

/// Default image-like extensions, rendered inline as a scaled image.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Preview strategy selected for a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewClass {
    /// Render as text, bounded to a maximum read size.
    Text,
    /// Render as a scaled image.
    Image,
    /// Delegate to the platform's default opener.
    External,
}

/// Extension sets driving classification. Comparison is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRules {
    pub text_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
}

impl Default for PreviewRules {
    fn default() -> Self {
        Self {
            text_extensions: DEFAULT_TEXT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PreviewRules {
    pub fn classify(&self, name: &str) -> PreviewClass {
        let Some(ext) = extension_of(name) else {
            return PreviewClass::External;
        };
        if self.text_extensions.iter().any(|t| t.eq_ignore_ascii_case(&ext)) {
            PreviewClass::Text
        } else if self.image_extensions.iter().any(|i| i.eq_ignore_ascii_case(&ext)) {
            PreviewClass::Image
        } else {
            PreviewClass::External
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text() {
        let rules = PreviewRules::default();
        assert_eq!(rules.classify("readme.txt"), PreviewClass::Text);
        assert_eq!(rules.classify("NOTES.TXT"), PreviewClass::Text);
        assert_eq!(rules.classify("changelog.md"), PreviewClass::Text);
    }

    #[test]
    fn test_classify_image() {
        let rules = PreviewRules::default();
        assert_eq!(rules.classify("photo.jpg"), PreviewClass::Image);
        assert_eq!(rules.classify("photo.JPEG"), PreviewClass::Image);
        assert_eq!(rules.classify("diagram.png"), PreviewClass::Image);
        assert_eq!(rules.classify("loop.gif"), PreviewClass::Image);
    }

    #[test]
    fn test_classify_external() {
        let rules = PreviewRules::default();
        assert_eq!(rules.classify("archive.zip"), PreviewClass::External);
        assert_eq!(rules.classify("video.mp4"), PreviewClass::External);
        assert_eq!(rules.classify("README"), PreviewClass::External);
        assert_eq!(rules.classify(".hidden"), PreviewClass::External);
    }

    #[test]
    fn test_classify_configured_extensions() {
        let rules = PreviewRules {
            text_extensions: vec!["csv".into()],
            image_extensions: vec!["webp".into()],
        };
        assert_eq!(rules.classify("data.csv"), PreviewClass::Text);
        assert_eq!(rules.classify("photo.webp"), PreviewClass::Image);
        assert_eq!(rules.classify("readme.txt"), PreviewClass::External);
    }
}
