//! Rooted navigation tree
//!
//! A `StorageTree` owns the root boundary for one user's files and the
//! current-folder cursor. Invariant: the cursor is always the root itself
//! or a descendant of it; paths are canonicalized before comparison so
//! neither `..`-style traversal nor a symlink can move it outside.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use drive_core::{validate_name, DriveError, DriveResult};

#[derive(Debug, Clone)]
pub struct StorageTree {
    root: PathBuf,
    current: PathBuf,
}

impl StorageTree {
    /// Open the storage tree for one user.
    ///
    /// The root folder is `<base>/<username>`, created on first use
    /// (idempotent). The username doubles as a path component, so it is
    /// validated like any entry name.
    pub async fn open(base: impl AsRef<Path>, username: &str) -> DriveResult<Self> {
        validate_name(username)?;
        let root = base.as_ref().join(username);
        fs::create_dir_all(&root).await?;
        let root = fs::canonicalize(&root).await?;
        Ok(Self {
            current: root.clone(),
            root,
        })
    }

    /// Re-create the root folder if it went missing. Idempotent.
    pub async fn ensure_root(&self) -> DriveResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current == self.root
    }

    /// Cursor position relative to the root, for display (`/` at the root).
    pub fn location(&self) -> String {
        match self.current.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => "/".to_string(),
            Ok(rel) => format!("/{}", rel.display()),
            Err(_) => "/".to_string(),
        }
    }

    /// Move the cursor into a child folder.
    ///
    /// Fails with `NotFound` unless `name` resolves to an existing folder
    /// under the current one.
    pub async fn enter(&mut self, name: &str) -> DriveResult<()> {
        let target = self.resolve(name).await?;
        match fs::metadata(&target).await {
            Ok(meta) if meta.is_dir() => {
                self.current = fs::canonicalize(&target).await?;
                Ok(())
            }
            Ok(_) => Err(DriveError::NotFound(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DriveError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Walk the cursor down a `/`-separated relative path, one `enter` per
    /// segment. Empty segments and a bare `.` path are no-ops.
    pub async fn enter_path(&mut self, relative: &str) -> DriveResult<()> {
        for segment in relative
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
        {
            self.enter(segment).await?;
        }
        Ok(())
    }

    /// Move the cursor to its parent folder.
    ///
    /// A no-op at the root; returns whether a move occurred.
    pub fn up(&mut self) -> bool {
        if self.current == self.root {
            return false;
        }
        match self.current.parent() {
            Some(parent) => {
                self.current = parent.to_path_buf();
                true
            }
            None => false,
        }
    }

    /// Canonical path for `name` under the current folder.
    ///
    /// Only single-component names are accepted, so a fresh (non-existing)
    /// target cannot escape. An existing symlink is accepted only when its
    /// target stays under the current folder.
    pub async fn resolve(&self, name: &str) -> DriveResult<PathBuf> {
        validate_name(name)?;
        let candidate = self.current.join(name);
        match fs::symlink_metadata(&candidate).await {
            Ok(meta) if !meta.is_symlink() => Ok(candidate),
            Ok(_) => {
                let real = fs::canonicalize(&candidate).await?;
                if real.starts_with(&self.current) {
                    Ok(candidate)
                } else {
                    Err(DriveError::InvalidName(name.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(candidate),
            Err(e) => Err(e.into()),
        }
    }
}
