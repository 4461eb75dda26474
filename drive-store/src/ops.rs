//! File operations
//!
//! Create-folder, upload, download, and recursive delete over one storage
//! tree. Each operation emits exactly one activity line on success and
//! none on failure; append failures are logged and swallowed. Mutating
//! operations on a root are serialized behind a single write lock, so the
//! quota gate always sees a settled usage figure.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use drive_core::{ActivityLog, DriveError, DriveResult};

use crate::quota::QuotaTracker;
use crate::tree::StorageTree;

pub struct FileOps {
    quota: QuotaTracker,
    activity: Arc<dyn ActivityLog>,
    write_lock: Mutex<()>,
}

impl FileOps {
    pub fn new(quota: QuotaTracker, activity: Arc<dyn ActivityLog>) -> Self {
        Self {
            quota,
            activity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Create a folder under the current one.
    ///
    /// An existing same-named entry surfaces as the underlying
    /// `AlreadyExists` I/O error.
    pub async fn create_folder(&self, tree: &StorageTree, name: &str) -> DriveResult<()> {
        let _guard = self.write_lock.lock().await;
        let target = tree.resolve(name).await?;
        fs::create_dir(&target).await?;
        debug!(folder = %target.display(), "created folder");
        self.log(format!("Created folder: {name}")).await;
        Ok(())
    }

    /// Copy a local file into the current folder as `dest_name`.
    ///
    /// The quota gate runs before anything touches the tree: a rejected
    /// upload leaves storage byte-for-byte as it was, with no destination
    /// file created. A copy that fails midway removes the partial
    /// destination. Returns the number of bytes copied.
    pub async fn upload(
        &self,
        tree: &StorageTree,
        source: &Path,
        dest_name: &str,
    ) -> DriveResult<u64> {
        let _guard = self.write_lock.lock().await;
        let dest = tree.resolve(dest_name).await?;

        let size = match fs::metadata(source).await {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Err(DriveError::InvalidName(source.display().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DriveError::NotFound(source.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        self.quota.ensure_fits(tree.root(), size).await?;

        let copied = copy_into(source, &dest).await?;
        debug!(source = %source.display(), dest = %dest.display(), copied, "uploaded file");
        self.log(format!("Uploaded file: {dest_name}")).await;
        Ok(copied)
    }

    /// Copy a stored file to a caller-chosen destination outside the tree.
    ///
    /// Folders are never downloadable. The destination is the caller's
    /// responsibility; no cleanup happens on that side.
    pub async fn download(
        &self,
        tree: &StorageTree,
        name: &str,
        dest: &Path,
    ) -> DriveResult<u64> {
        let source = tree.resolve(name).await?;
        let meta = match fs::metadata(&source).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DriveError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if meta.is_dir() {
            return Err(DriveError::InvalidName(name.to_string()));
        }

        let copied = fs::copy(&source, dest).await?;
        debug!(name, dest = %dest.display(), copied, "downloaded file");
        self.log(format!("Downloaded file: {name}")).await;
        Ok(copied)
    }

    /// Delete an entry under the current folder; folders are removed
    /// depth-first. Returns how many entries were removed.
    ///
    /// A failed descendant stops the walk with `DeleteIncomplete`, which
    /// reports the removed/remaining split instead of claiming success.
    pub async fn delete(&self, tree: &StorageTree, name: &str) -> DriveResult<usize> {
        let _guard = self.write_lock.lock().await;
        let target = tree.resolve(name).await?;

        let meta = match fs::symlink_metadata(&target).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DriveError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let removed = if meta.is_dir() {
            delete_tree(&target, name).await?
        } else {
            fs::remove_file(&target).await?;
            1
        };
        debug!(name, removed, "deleted entry");
        self.log(format!("Deleted: {name}")).await;
        Ok(removed)
    }

    async fn log(&self, line: String) {
        if let Err(e) = self.activity.append(&line).await {
            warn!("activity log append failed: {e}");
        }
    }
}

/// Copy `source` to a destination that must not exist yet. A partially
/// written destination is removed on failure rather than left dangling.
async fn copy_into(source: &Path, dest: &Path) -> DriveResult<u64> {
    let mut src = fs::File::open(source).await?;
    let mut dst = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .await?;

    let written = match tokio::io::copy(&mut src, &mut dst).await {
        Ok(n) => dst.flush().await.map(|_| n),
        Err(e) => Err(e),
    };
    drop(dst);

    match written {
        Ok(n) => Ok(n),
        Err(e) => {
            let _ = fs::remove_file(dest).await;
            Err(e.into())
        }
    }
}

/// Remove a folder and everything below it, deepest entries first, so
/// every descendant is attempted before its parent. Symlinks are removed
/// as links and never followed; real directories are tracked by canonical
/// path so a cycle cannot keep the walk alive.
async fn delete_tree(root: &Path, name: &str) -> DriveResult<usize> {
    let mut inventory: Vec<PathBuf> = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let canonical = fs::canonicalize(&dir).await?;
        if !visited.insert(canonical) {
            continue;
        }
        let mut read_dir = fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path.clone());
            }
            inventory.push(path);
        }
    }
    inventory.push(root.to_path_buf());
    inventory.sort_by_key(|p| Reverse(p.components().count()));

    let total = inventory.len();
    for (index, path) in inventory.iter().enumerate() {
        let result = match fs::symlink_metadata(path).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir(path).await,
            Ok(_) => fs::remove_file(path).await,
            // Already gone; counts as removed.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            return Err(DriveError::DeleteIncomplete {
                name: name.to_string(),
                removed: index,
                left: total - index,
                reason: format!("{}: {}", path.display(), e),
            });
        }
    }
    Ok(total)
}
