//! Activity sinks
//!
//! Two implementations of the append-only activity contract: one that
//! forwards lines to `tracing`, and an in-memory one used by the
//! interactive shell and tests. Neither promises persistence.

use async_trait::async_trait;
use tokio::sync::Mutex;

use drive_core::{ActivityLog, DriveResult};

/// Emits each activity line as a tracing event.
#[derive(Debug, Default)]
pub struct TracingActivityLog;

#[async_trait]
impl ActivityLog for TracingActivityLog {
    async fn append(&self, line: &str) -> DriveResult<()> {
        tracing::info!(target: "minidrive::activity", "{line}");
        Ok(())
    }
}

/// Keeps lines in memory, in append order.
#[derive(Debug, Default)]
pub struct MemoryActivityLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }
}

#[async_trait]
impl ActivityLog for MemoryActivityLog {
    async fn append(&self, line: &str) -> DriveResult<()> {
        self.lines.lock().await.push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_log_preserves_order() {
        let log = MemoryActivityLog::new();
        log.append("Created folder: Notes").await.unwrap();
        log.append("Uploaded file: a.txt").await.unwrap();
        log.append("Deleted: Notes").await.unwrap();

        assert_eq!(
            log.lines().await,
            vec![
                "Created folder: Notes",
                "Uploaded file: a.txt",
                "Deleted: Notes"
            ]
        );
    }
}
