//! Credential storage for the Trello API key and token.
//!
//! Credentials live in a small TOML file:
//!
//! ```toml
//! key = "0123456789abcdef"
//! token = "fedcba9876543210"
//! ```
//!
//! # Resolution
//!
//! 1. `TRELLOLO_CREDENTIALS_PATH` environment variable, if set
//! 2. XDG config directory (`~/.config/trellolo/credentials.toml`)

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable overriding the credentials file location.
pub const CREDENTIALS_PATH_ENV: &str = "TRELLOLO_CREDENTIALS_PATH";

/// Errors that can occur while reading or writing the credentials file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No credentials file exists yet.
    #[error(
        "No api key or token found.\n  Run: [ trellolo config --help ] for more information."
    )]
    Missing,

    /// The file exists but does not hold a key and a token.
    #[error("Unable to load config.\n  Check {}:\n  {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// I/O error while writing the file.
    #[error("Unable to write to file:\n  {0}")]
    Io(#[from] std::io::Error),

    /// The credentials could not be encoded as TOML.
    #[error("failed to encode credentials: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No location could be determined for the file.
    #[error("unable to determine a config directory for the credentials file")]
    NoConfigDir,
}

/// A Trello API key and token pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }
}

// Keeps secrets out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// File-backed store for [`Credentials`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the resolved default location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when neither the environment
    /// override nor a platform config directory is available.
    pub fn resolve() -> Result<Self, ConfigError> {
        env_override()
            .or_else(xdg_config_path)
            .map(Self::at)
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the pair, creating parent directories as needed.
    pub fn save(&self, key: &str, token: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(&Credentials::new(key, token))?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }

    /// Reads the pair back, returning `None` if absent or unparseable.
    pub fn load(&self) -> Option<Credentials> {
        match self.try_load() {
            Ok(credentials) => Some(credentials),
            Err(ConfigError::Missing) => None,
            Err(err) => {
                warn!(path = %self.path.display(), "ignoring credentials file: {err}");
                None
            }
        }
    }

    /// Reads the pair back, telling a missing file apart from a bad one.
    pub fn try_load(&self) -> Result<Credentials, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing);
            }
            Err(err) => {
                return Err(ConfigError::Unreadable {
                    path: self.path.clone(),
                    reason: err.to_string(),
                });
            }
        };

        let credentials: Credentials =
            toml::from_str(&contents).map_err(|e| ConfigError::Unreadable {
                path: self.path.clone(),
                reason: e.message().to_string(),
            })?;

        if credentials.key.trim().is_empty() || credentials.token.trim().is_empty() {
            return Err(ConfigError::Unreadable {
                path: self.path.clone(),
                reason: "key and token must not be empty".to_string(),
            });
        }
        Ok(credentials)
    }
}

fn env_override() -> Option<PathBuf> {
    std::env::var_os(CREDENTIALS_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn xdg_config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("trellolo").join("credentials.toml"))
}
