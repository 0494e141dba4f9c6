//! The locally persisted sign-in marker.
//!
//! The marker only records who signed in and when; it carries no credential.

use std::fs;
use std::path::PathBuf;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StewardError};
use crate::paths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMarker {
    pub username: String,
    pub signed_in_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    path: PathBuf,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new(paths::session_path())
    }
}

impl AuthSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Write a fresh marker for `username`, replacing any existing one.
    pub fn login(&self, username: &str) -> Result<SessionMarker> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StewardError::InvalidInput(
                "username cannot be empty".to_string(),
            ));
        }

        let marker = SessionMarker {
            username: username.to_string(),
            signed_in_at: Timestamp::now(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&marker)?)?;
        tracing::debug!(username = %marker.username, "signed in");
        Ok(marker)
    }

    /// Remove the marker. Returns whether one existed.
    pub fn logout(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The current marker. An unreadable marker counts as signed out.
    pub fn current(&self) -> Option<SessionMarker> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "cannot read session marker");
                }
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(marker) => Some(marker),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt session marker");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn require(&self) -> Result<SessionMarker> {
        self.current().ok_or(StewardError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> AuthSession {
        AuthSession::new(dir.path().join("state").join("session.json"))
    }

    #[test]
    fn test_login_then_logout() {
        let dir = TempDir::new().unwrap();
        let auth = session(&dir);

        assert!(!auth.is_authenticated());
        let marker = auth.login("  jordan ").unwrap();
        assert_eq!(marker.username, "jordan");
        assert_eq!(auth.require().unwrap(), marker);

        assert!(auth.logout().unwrap());
        assert!(!auth.logout().unwrap());
        assert!(matches!(auth.require(), Err(StewardError::NotAuthenticated)));
    }

    #[test]
    fn test_blank_username_is_rejected() {
        let dir = TempDir::new().unwrap();
        let auth = session(&dir);

        assert!(matches!(
            auth.login("   "),
            Err(StewardError::InvalidInput(_))
        ));
        assert!(!auth.path().exists());
    }

    #[test]
    fn test_corrupt_marker_means_signed_out() {
        let dir = TempDir::new().unwrap();
        let auth = AuthSession::new(dir.path().join("session.json"));
        fs::write(auth.path(), "{ not json").unwrap();

        assert_eq!(auth.current(), None);
        assert!(auth.login("sam").is_ok());
        assert_eq!(auth.current().unwrap().username, "sam");
    }
}
