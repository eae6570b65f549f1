//! User settings for msgcrypt
//!
//! Holds the stored account credentials, the retry policy for sync calls,
//! and the default log filter. The derived key and the password are never
//! part of the settings.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paths::CryptPaths;
use crate::crypto::PasswordHash;
use crate::error::CryptError;
use crate::retry::RetryPolicy;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Credentials persisted after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettings {
    /// Server-issued account identifier
    pub account_id: String,

    /// Output of the first derivation pass
    pub password_hash: PasswordHash,

    /// Salt for the second derivation pass
    pub key_salt: String,

    /// When the hash was computed
    pub logged_in_at: DateTime<Utc>,
}

/// Retry settings for calls that carry encrypted payloads
///
/// Read by library callers that sync envelopes; the CLI itself never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay unit; the n-th retry waits n times this long
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            base_delay_ms: 1000,
        }
    }
}

impl RetrySettings {
    /// Build the retry policy these settings describe
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// User settings for msgcrypt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Retry policy for sync calls
    #[serde(default)]
    pub retry: RetrySettings,

    /// Stored credentials, absent when logged out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSettings>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_filter() -> String {
    "msgcrypt=info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_filter: default_log_filter(),
            retry: RetrySettings::default(),
            account: None,
        }
    }
}

impl Settings {
    /// Check if account credentials are stored
    pub fn is_logged_in(&self) -> bool {
        self.account.is_some()
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Defaults are not written back; the caller decides when to persist.
    pub fn load_or_create(paths: &CryptPaths) -> Result<Self, CryptError> {
        read_json(paths.settings_file())
            .map_err(|e| CryptError::Config(format!("Failed to load settings: {}", e)))
    }

    /// Save settings to disk atomically
    pub fn save(&self, paths: &CryptPaths) -> Result<(), CryptError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
