//! Entry name validation
//!
//! Every operation addresses children of the current folder by bare name.
//! A valid name is a single path component: it can never move the resolved
//! path above the folder it is joined to.

use crate::error::{DriveError, DriveResult};

/// Characters that would let a name span path components.
const SEPARATORS: &[char] = &['/', '\\'];

/// Validate a single-component entry name.
///
/// Rejects empty or all-whitespace names, path separators, NUL bytes, and
/// the `.`/`..` components.
pub fn validate_name(name: &str) -> DriveResult<()> {
    if name.trim().is_empty() {
        return Err(DriveError::InvalidName(name.to_string()));
    }
    if name == "." || name == ".." {
        return Err(DriveError::InvalidName(name.to_string()));
    }
    if name.contains(SEPARATORS) || name.contains('\0') {
        return Err(DriveError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Lowercased extension of a file name, if any.
///
/// `"Photo.JPG"` yields `Some("jpg")`; a leading dot alone (`".hidden"`)
/// does not count as an extension.
pub fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        assert!(validate_name("report.txt").is_ok());
        assert!(validate_name("Notes").is_ok());
        assert!(validate_name("archive.tar.gz").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("日本語ファイル.txt").is_ok());
    }

    #[test]
    fn test_rejects_blank() {
        assert!(matches!(validate_name(""), Err(DriveError::InvalidName(_))));
        assert!(matches!(validate_name("   "), Err(DriveError::InvalidName(_))));
        assert!(matches!(validate_name("\t"), Err(DriveError::InvalidName(_))));
    }

    #[test]
    fn test_rejects_separators() {
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
        assert!(validate_name("/etc").is_err());
        assert!(validate_name("..\\up").is_err());
    }

    #[test]
    fn test_rejects_traversal_components() {
        assert!(validate_name(".").is_err());
        assert!(validate_name("..").is_err());
        // "..." is an ordinary (if odd) file name
        assert!(validate_name("...").is_ok());
    }

    #[test]
    fn test_rejects_nul() {
        assert!(validate_name("a\0b").is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), Some("jpg".into()));
        assert_eq!(extension_of("notes.txt"), Some("txt".into()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".into()));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
    }
}
