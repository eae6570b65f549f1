//! Path management for msgcrypt
//!
//! ## Path Resolution Order
//!
//! 1. `MSGCRYPT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/msgcrypt` or `~/.config/msgcrypt`
//! 3. Windows: `%APPDATA%\msgcrypt`

use std::path::PathBuf;

use crate::error::CryptError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MSGCRYPT_DATA_DIR";

/// Manages all paths used by msgcrypt
#[derive(Debug, Clone)]
pub struct CryptPaths {
    /// Base directory for all msgcrypt data
    base_dir: PathBuf,
}

impl CryptPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CryptError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create CryptPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), CryptError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CryptError::Io(format!("Failed to create base directory: {}", e)))
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, CryptError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config"))
            .ok_or_else(|| CryptError::Config("Could not determine home directory".into()))?,
    };
    Ok(config_base.join("msgcrypt"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, CryptError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| CryptError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("msgcrypt"))
}
