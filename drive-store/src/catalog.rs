//! Current-folder listings
//!
//! Entries are materialized fresh on every call, in whatever order the
//! filesystem yields them; callers that want a sorted view sort at the
//! presentation layer.

use drive_core::{DriveResult, Entry};
use tokio::fs;

use crate::tree::StorageTree;

/// Entries directly inside the current folder.
pub async fn list(tree: &StorageTree) -> DriveResult<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(tree.current()).await?;

    while let Some(dir_entry) = read_dir.next_entry().await? {
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        let meta = match fs::metadata(dir_entry.path()).await {
            Ok(m) => m,
            // Entry vanished between readdir and stat.
            Err(_) => continue,
        };
        let mut entry = if meta.is_dir() {
            Entry::folder(name)
        } else {
            Entry::file(name, meta.len())
        };
        if let Ok(modified) = meta.modified() {
            entry = entry.with_modified(modified.into());
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// `list` restricted to entries whose name contains `query`,
/// case-insensitively. An empty query matches everything.
pub async fn filter(tree: &StorageTree, query: &str) -> DriveResult<Vec<Entry>> {
    let mut entries = list(tree).await?;
    entries.retain(|e| e.name_contains(query));
    Ok(entries)
}
