//! Platform default opener
//!
//! Fallback branch of preview dispatch: hand the file to whatever the
//! desktop associates with it.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use drive_core::{DriveResult, ExternalOpener};

/// Opens a file with the platform's default application.
#[derive(Debug, Default)]
pub struct SystemOpener;

#[async_trait]
impl ExternalOpener for SystemOpener {
    async fn open_externally(&self, path: &Path) -> DriveResult<()> {
        let status = open_command(path).status().await?;
        if !status.success() {
            return Err(std::io::Error::other(format!("opener exited with {status}")).into());
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(windows)]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", windows)))]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
