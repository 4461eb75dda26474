//! Quota tracking
//!
//! Usage is recomputed from the filesystem on every check; nothing is
//! cached, so the figure is whatever the tree holds at call time.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use drive_core::{DriveError, DriveResult};

/// Default quota: 50 MiB per storage area.
pub const DEFAULT_QUOTA_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct QuotaTracker {
    max_bytes: u64,
}

impl QuotaTracker {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Total bytes of all files reachable under `root`, at any depth.
    ///
    /// Directories are visited once by canonical path, so a symlink cycle
    /// terminates; a revisited directory contributes nothing further.
    /// Entries vanishing mid-walk are skipped rather than failing the sum.
    pub async fn used_bytes(&self, root: &Path) -> DriveResult<u64> {
        let root = fs::canonicalize(root).await?;
        let mut total = 0u64;
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut pending = vec![root];

        while let Some(dir) = pending.pop() {
            if !visited.insert(dir.clone()) {
                continue;
            }
            let mut read_dir = match fs::read_dir(&dir).await {
                Ok(rd) => rd,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = read_dir.next_entry().await? {
                let path = entry.path();
                let meta = match fs::metadata(&path).await {
                    Ok(m) => m,
                    Err(_) => continue,
                };
                if meta.is_dir() {
                    if let Ok(canonical) = fs::canonicalize(&path).await {
                        pending.push(canonical);
                    }
                } else if meta.is_file() {
                    total += meta.len();
                }
            }
        }
        Ok(total)
    }

    /// Pure predicate: would adding `additional` bytes pass the limit?
    pub async fn would_exceed(&self, root: &Path, additional: u64) -> DriveResult<bool> {
        let used = self.used_bytes(root).await?;
        Ok(used.saturating_add(additional) > self.max_bytes)
    }

    /// Gate used before a size-increasing mutation: errors with
    /// `QuotaExceeded` (carrying the observed usage) instead of answering
    /// a boolean.
    pub async fn ensure_fits(&self, root: &Path, additional: u64) -> DriveResult<()> {
        let used = self.used_bytes(root).await?;
        if used.saturating_add(additional) > self.max_bytes {
            return Err(DriveError::QuotaExceeded {
                used,
                requested: additional,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Usage as a whole percentage, floored and clamped to [0, 100].
    ///
    /// The clamp is display-only; the underlying checks never clamp, and
    /// usage can genuinely sit above the limit if the quota was lowered
    /// after files landed.
    pub async fn percent_used(&self, root: &Path) -> DriveResult<u8> {
        if self.max_bytes == 0 {
            return Ok(100);
        }
        let used = self.used_bytes(root).await?;
        let percent = used.saturating_mul(100) / self.max_bytes;
        Ok(percent.min(100) as u8)
    }
}
