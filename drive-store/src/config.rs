//! TOML configuration
//!
//! Everything has a serde default, so an empty or missing file yields a
//! working setup: `storage/` next to the working directory, the stock
//! 50 MiB quota, and no credential check.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use drive_core::{DriveResult, PreviewRules};

use crate::preview::DEFAULT_MAX_TEXT_BYTES;
use crate::quota::DEFAULT_QUOTA_BYTES;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub storage: StorageConfig,
    pub preview: PreviewConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory holding one root folder per username.
    pub base_dir: PathBuf,
    /// Total bytes permitted across one storage root's subtree.
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("storage"),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub text_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub max_text_bytes: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let rules = PreviewRules::default();
        Self {
            text_extensions: rules.text_extensions,
            image_extensions: rules.image_extensions,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

impl PreviewConfig {
    pub fn rules(&self) -> PreviewRules {
        PreviewRules {
            text_extensions: self.text_extensions.clone(),
            image_extensions: self.image_extensions.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Credential file of `username,argon2-hash` records. When unset,
    /// sessions open without a password check.
    pub credentials_file: Option<PathBuf>,
}

impl DriveConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub async fn load(path: &Path) -> DriveResult<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e).into()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DriveConfig::load(&dir.path().join("absent.toml"))
            .await
            .unwrap();

        assert_eq!(config.storage.base_dir, PathBuf::from("storage"));
        assert_eq!(config.storage.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert!(config.auth.credentials_file.is_none());
        assert_eq!(config.preview.max_text_bytes, DEFAULT_MAX_TEXT_BYTES);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minidrive.toml");
        tokio::fs::write(
            &path,
            r#"
[storage]
quota_bytes = 1048576

[auth]
credentials_file = "users.txt"
"#,
        )
        .await
        .unwrap();

        let config = DriveConfig::load(&path).await.unwrap();
        assert_eq!(config.storage.quota_bytes, 1048576);
        assert_eq!(config.storage.base_dir, PathBuf::from("storage"));
        assert_eq!(
            config.auth.credentials_file,
            Some(PathBuf::from("users.txt"))
        );
    }

    #[tokio::test]
    async fn test_preview_rules_from_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minidrive.toml");
        tokio::fs::write(
            &path,
            r#"
[preview]
text_extensions = ["txt", "csv"]
image_extensions = ["png"]
max_text_bytes = 1024
"#,
        )
        .await
        .unwrap();

        let config = DriveConfig::load(&path).await.unwrap();
        let rules = config.preview.rules();
        assert_eq!(rules.text_extensions, vec!["txt", "csv"]);
        assert_eq!(rules.image_extensions, vec!["png"]);
        assert_eq!(config.preview.max_text_bytes, 1024);
    }

    #[tokio::test]
    async fn test_malformed_file_is_io_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minidrive.toml");
        tokio::fs::write(&path, "storage = not toml [").await.unwrap();

        let err = DriveConfig::load(&path).await.unwrap_err();
        assert!(err.is_io_failure());
    }
}
