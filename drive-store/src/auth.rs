//! Credential verification
//!
//! Credentials live in a line-delimited file of `username,argon2-phc-hash`
//! records. Passwords are hashed with Argon2id; nothing stores or compares
//! plaintext.

use std::io::ErrorKind;
use std::path::PathBuf;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use rand_core::OsRng;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use drive_core::{validate_name, Authenticator, DriveError, DriveResult};

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Register a user, hashing the password. The username must be usable
    /// as a storage-root folder name and must be new.
    pub async fn add_user(&self, username: &str, password: &str) -> DriveResult<()> {
        validate_name(username)?;
        if username.contains(',') {
            return Err(DriveError::InvalidName(username.to_string()));
        }
        let records = self.load().await?;
        if records.iter().any(|(user, _)| user == username) {
            return Err(std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!("user {username} already registered"),
            )
            .into());
        }

        let hash = hash_password(password)?;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{username},{hash}\n").as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }

    async fn load(&self) -> DriveResult<Vec<(String, String)>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // No file yet means no users, not an error.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(content
            .lines()
            .filter_map(|line| {
                let (user, hash) = line.split_once(',')?;
                Some((user.to_string(), hash.to_string()))
            })
            .collect())
    }
}

#[async_trait]
impl Authenticator for CredentialFile {
    async fn authenticate(&self, username: &str, password: &str) -> DriveResult<bool> {
        for (user, hash) in self.load().await? {
            if user == username {
                return Ok(verify_password(password, &hash));
            }
        }
        Ok(false)
    }
}

/// Hash a password into a PHC string (salt and parameters included).
pub fn hash_password(password: &str) -> DriveResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| std::io::Error::other(format!("password hashing failed: {e}")).into())
}

/// Verify a password against a stored PHC hash. Malformed hashes verify
/// as false rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> CredentialFile {
        CredentialFile::new(dir.path().join("users.txt"))
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2!", &hash));
        assert!(!verify_password("hunter3!", &hash));
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_authenticate_registered_user() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        creds.add_user("alice", "correct horse").await.unwrap();

        assert!(creds.authenticate("alice", "correct horse").await.unwrap());
        assert!(!creds.authenticate("alice", "wrong").await.unwrap());
        assert!(!creds.authenticate("bob", "correct horse").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_without_file() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        assert!(!creds.authenticate("alice", "pw").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_user_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        creds.add_user("alice", "pw-one").await.unwrap();

        let err = creds.add_user("alice", "pw-two").await.unwrap_err();
        assert!(err.is_io_failure());
        // Original credentials still verify.
        assert!(creds.authenticate("alice", "pw-one").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_user_rejects_unusable_names() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        for bad in ["", "a/b", "..", "eve,admin"] {
            assert!(matches!(
                creds.add_user(bad, "pw").await,
                Err(DriveError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_multiple_users() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        creds.add_user("alice", "alpha-pass").await.unwrap();
        creds.add_user("bob", "beta-pass").await.unwrap();

        assert!(creds.authenticate("alice", "alpha-pass").await.unwrap());
        assert!(creds.authenticate("bob", "beta-pass").await.unwrap());
        assert!(!creds.authenticate("alice", "beta-pass").await.unwrap());
    }
}
