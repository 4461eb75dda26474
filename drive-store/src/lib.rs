//! MiniDrive storage engine
//!
//! Owns one user's storage area: the rooted navigation tree, quota
//! enforcement, listings, file operations, and preview dispatch. External
//! concerns (credential store, activity sink, platform opener) come in
//! through the boundary traits in `drive-core`.

pub mod activity;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod opener;
pub mod ops;
pub mod preview;
pub mod quota;
pub mod session;
pub mod tree;

pub use activity::{MemoryActivityLog, TracingActivityLog};
pub use auth::CredentialFile;
pub use config::DriveConfig;
pub use opener::SystemOpener;
pub use ops::FileOps;
pub use preview::{Preview, PreviewDispatcher};
pub use quota::{QuotaTracker, DEFAULT_QUOTA_BYTES};
pub use session::Session;
pub use tree::StorageTree;
