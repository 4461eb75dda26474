//! Preview dispatch
//!
//! Classification is pure and name-based (`drive-core`); this module reads
//! just enough of the file to render the selected strategy. Nothing here
//! mutates the tree.

use std::io::Cursor;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use image::ImageReader;
use tokio::fs;
use tokio::io::AsyncReadExt;

use drive_core::{DriveError, DriveResult, ExternalOpener, PreviewClass, PreviewRules};

use crate::tree::StorageTree;

/// Default bound on inline text reads: enough for a glance, never the
/// whole of an arbitrarily large file.
pub const DEFAULT_MAX_TEXT_BYTES: u64 = 64 * 1024;

/// Bounding box for inline image previews.
pub const IMAGE_PREVIEW_DIMENSION: u32 = 250;

/// Rendered preview handed back to the caller.
#[derive(Debug, Clone)]
pub enum Preview {
    Text { content: String, truncated: bool },
    Image { png: Bytes, width: u32, height: u32 },
    /// Handed off to the platform's default opener.
    External,
}

pub struct PreviewDispatcher {
    rules: PreviewRules,
    max_text_bytes: u64,
    opener: Arc<dyn ExternalOpener>,
}

impl PreviewDispatcher {
    pub fn new(opener: Arc<dyn ExternalOpener>) -> Self {
        Self::with_rules(PreviewRules::default(), DEFAULT_MAX_TEXT_BYTES, opener)
    }

    pub fn with_rules(
        rules: PreviewRules,
        max_text_bytes: u64,
        opener: Arc<dyn ExternalOpener>,
    ) -> Self {
        Self {
            rules,
            max_text_bytes,
            opener,
        }
    }

    /// Strategy that `preview` would select for this name. Pure.
    pub fn classify(&self, name: &str) -> PreviewClass {
        self.rules.classify(name)
    }

    /// Render a preview for a file in the current folder.
    pub async fn preview(&self, tree: &StorageTree, name: &str) -> DriveResult<Preview> {
        let path = tree.resolve(name).await?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(DriveError::PreviewUnavailable(format!(
                    "{name} is a folder"
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DriveError::NotFound(name.to_string()))
            }
            Err(e) => return Err(DriveError::PreviewUnavailable(e.to_string())),
        }

        match self.rules.classify(name) {
            PreviewClass::Text => self.render_text(&path).await,
            PreviewClass::Image => self.render_image(&path).await,
            PreviewClass::External => {
                self.opener.open_externally(&path).await?;
                Ok(Preview::External)
            }
        }
    }

    async fn render_text(&self, path: &Path) -> DriveResult<Preview> {
        let file = fs::File::open(path).await.map_err(preview_failure)?;
        // Read one byte past the bound so truncation is known without a
        // second stat.
        let mut bounded = file.take(self.max_text_bytes + 1);
        let mut buf = Vec::new();
        bounded.read_to_end(&mut buf).await.map_err(preview_failure)?;

        let truncated = buf.len() as u64 > self.max_text_bytes;
        if truncated {
            buf.truncate(self.max_text_bytes as usize);
        }
        Ok(Preview::Text {
            content: String::from_utf8_lossy(&buf).into_owned(),
            truncated,
        })
    }

    async fn render_image(&self, path: &Path) -> DriveResult<Preview> {
        let data = fs::read(path).await.map_err(preview_failure)?;
        // Decoding and scaling are CPU-bound; keep them off the runtime.
        tokio::task::spawn_blocking(move || scale_image(&data))
            .await
            .map_err(|e| DriveError::PreviewUnavailable(e.to_string()))?
    }
}

fn preview_failure(e: std::io::Error) -> DriveError {
    DriveError::PreviewUnavailable(e.to_string())
}

/// Decode, scale to fit within the preview box preserving aspect ratio,
/// and re-encode as PNG.
fn scale_image(data: &[u8]) -> DriveResult<Preview> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| DriveError::PreviewUnavailable(format!("unrecognized image: {e}")))?;
    let img = reader
        .decode()
        .map_err(|e| DriveError::PreviewUnavailable(format!("decode failed: {e}")))?;

    let scaled = img.resize(
        IMAGE_PREVIEW_DIMENSION,
        IMAGE_PREVIEW_DIMENSION,
        image::imageops::FilterType::Lanczos3,
    );

    let mut out = Vec::new();
    scaled
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| DriveError::PreviewUnavailable(format!("encode failed: {e}")))?;

    Ok(Preview::Image {
        width: scaled.width(),
        height: scaled.height(),
        png: Bytes::from(out),
    })
}
