//! Configuration module for msgcrypt
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (stored credentials, retry policy, log filter)

pub mod paths;
pub mod settings;

pub use paths::CryptPaths;
pub use settings::{AccountSettings, RetrySettings, Settings};
