//! Per-user session assembly
//!
//! A session ties one authenticated identity to its storage tree and the
//! engine pieces operating on it. Pure wiring: the components keep all the
//! behavior.

use std::sync::Arc;

use drive_core::{ActivityLog, Authenticator, DriveResult};

use crate::config::DriveConfig;
use crate::opener::SystemOpener;
use crate::ops::FileOps;
use crate::preview::PreviewDispatcher;
use crate::quota::QuotaTracker;
use crate::tree::StorageTree;

pub struct Session {
    username: String,
    tree: StorageTree,
    ops: FileOps,
    preview: PreviewDispatcher,
    activity: Arc<dyn ActivityLog>,
}

impl Session {
    /// Open a session without a credential check (no credential file is
    /// configured, or the caller verified the identity elsewhere).
    pub async fn open(
        config: &DriveConfig,
        username: &str,
        activity: Arc<dyn ActivityLog>,
    ) -> DriveResult<Self> {
        let tree = StorageTree::open(&config.storage.base_dir, username).await?;
        let quota = QuotaTracker::new(config.storage.quota_bytes);
        let ops = FileOps::new(quota, activity.clone());
        let preview = PreviewDispatcher::with_rules(
            config.preview.rules(),
            config.preview.max_text_bytes,
            Arc::new(SystemOpener),
        );
        Ok(Self {
            username: username.to_string(),
            tree,
            ops,
            preview,
            activity,
        })
    }

    /// Verify credentials and open on success; `None` means the pair was
    /// rejected (as opposed to the credential store failing).
    pub async fn login(
        config: &DriveConfig,
        auth: &dyn Authenticator,
        username: &str,
        password: &str,
        activity: Arc<dyn ActivityLog>,
    ) -> DriveResult<Option<Self>> {
        if !auth.authenticate(username, password).await? {
            return Ok(None);
        }
        Ok(Some(Self::open(config, username, activity).await?))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn tree(&self) -> &StorageTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut StorageTree {
        &mut self.tree
    }

    pub fn ops(&self) -> &FileOps {
        &self.ops
    }

    pub fn preview(&self) -> &PreviewDispatcher {
        &self.preview
    }

    pub fn activity(&self) -> &Arc<dyn ActivityLog> {
        &self.activity
    }
}
