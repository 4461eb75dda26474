//! External collaborator interfaces
//!
//! These boundaries are consumed by the store but implemented elsewhere:
//! the store only depends on the contracts below.

use std::path::Path;

use async_trait::async_trait;

use crate::error::DriveResult;

/// Append-only activity sink.
///
/// Ordering is call order. Persistence is up to the implementation; the
/// store treats append failures as best-effort and never aborts the
/// triggering operation because of one.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn append(&self, line: &str) -> DriveResult<()>;
}

/// Credential verification boundary.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns whether the username/password pair matches a stored
    /// credential. Errors are reserved for credential-store failures, not
    /// for mismatches.
    async fn authenticate(&self, username: &str, password: &str) -> DriveResult<bool>;
}

/// Platform default-opener boundary, used for files no inline preview
/// strategy covers.
#[async_trait]
pub trait ExternalOpener: Send + Sync {
    async fn open_externally(&self, path: &Path) -> DriveResult<()>;
}
