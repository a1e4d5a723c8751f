//! Kaggle credentials file (`kaggle.json`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

pub const CREDENTIALS_FILE: &str = "kaggle.json";

/// Contents of `kaggle.json`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl KaggleCredentials {
    pub fn new(username: &str, key: &str) -> Self {
        Self {
            username: username.to_string(),
            key: key.to_string(),
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CREDENTIALS_FILE)
    }

    /// Write `kaggle.json` into `dir`, readable by the owner only
    pub fn store(&self, dir: &Path) -> Result<PathBuf, LeaderboardError> {
        let path = Self::path_in(dir);
        let credentials_error = |message: String| LeaderboardError::Credentials {
            path: path.clone(),
            message,
        };

        fs::create_dir_all(dir).map_err(|e| credentials_error(e.to_string()))?;
        let body = serde_json::to_string(self).map_err(|e| credentials_error(e.to_string()))?;
        fs::write(&path, body).map_err(|e| credentials_error(e.to_string()))?;
        restrict_permissions(&path).map_err(|e| credentials_error(e.to_string()))?;

        Ok(path)
    }

    /// Read `kaggle.json` from `dir`
    pub fn load(dir: &Path) -> Result<Self, LeaderboardError> {
        let path = Self::path_in(dir);
        let raw = fs::read_to_string(&path).map_err(|e| LeaderboardError::Credentials {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let credentials: Self =
            serde_json::from_str(&raw).map_err(|e| LeaderboardError::Credentials {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if credentials.username.trim().is_empty() || credentials.key.trim().is_empty() {
            return Err(LeaderboardError::Credentials {
                path,
                message: "username and key must both be set".to_string(),
            });
        }
        Ok(credentials)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
