//! Error types for MiniDrive

use thiserror::Error;

/// Result type alias
pub type DriveResult<T> = Result<T, DriveError>;

/// Main error type
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("quota exceeded: {used} of {limit} bytes in use, {requested} more requested")]
    QuotaExceeded {
        used: u64,
        requested: u64,
        limit: u64,
    },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("delete incomplete: removed {removed} entries under {name:?}, {left} left ({reason})")]
    DeleteIncomplete {
        name: String,
        removed: usize,
        left: usize,
        reason: String,
    },

    #[error("preview unavailable: {0}")]
    PreviewUnavailable(String),
}

impl DriveError {
    /// Underlying read/write/copy/delete failures, including the reported
    /// partial-delete outcome.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, DriveError::Io(_) | DriveError::DeleteIncomplete { .. })
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, DriveError::QuotaExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_io_failure() {
        let io = DriveError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(io.is_io_failure());

        let partial = DriveError::DeleteIncomplete {
            name: "Photos".into(),
            removed: 3,
            left: 2,
            reason: "permission denied".into(),
        };
        assert!(partial.is_io_failure());

        assert!(!DriveError::NotFound("a.txt".into()).is_io_failure());
        assert!(!DriveError::InvalidName("".into()).is_io_failure());
    }

    #[test]
    fn test_is_quota_exceeded() {
        let err = DriveError::QuotaExceeded {
            used: 6,
            requested: 5,
            limit: 10,
        };
        assert!(err.is_quota_exceeded());
        assert!(!err.is_io_failure());
    }

    #[test]
    fn test_error_display() {
        let err = DriveError::QuotaExceeded {
            used: 6,
            requested: 5,
            limit: 10,
        };
        assert_eq!(
            format!("{}", err),
            "quota exceeded: 6 of 10 bytes in use, 5 more requested"
        );

        let err = DriveError::NotFound("notes/a.txt".into());
        assert_eq!(format!("{}", err), "not found: notes/a.txt");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DriveError = io_err.into();
        assert!(matches!(err, DriveError::Io(_)));
    }
}
