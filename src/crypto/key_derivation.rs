//! Key derivation using PBKDF2-HMAC-SHA1
//!
//! Two passes turn a user's password into an AES-256 key:
//!
//! 1. [`hash_password`] stretches the password with a server-issued salt.
//!    The base64 output is what gets persisted in place of the password.
//! 2. [`create_key`] stretches `"<account id>:<password hash>"` with a second,
//!    independent salt to produce the session key.
//!
//! Both passes use the same iteration count and output length, and both block
//! the calling thread for the whole derivation.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 iteration count used by both derivation passes
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Derived key length in bits
pub const KEY_LENGTH_BITS: usize = 256;

/// Derived key length in bytes (AES-256)
pub const KEY_LENGTH: usize = KEY_LENGTH_BITS / 8;

/// Base64-encoded output of the first derivation pass
///
/// This is the durable artifact stored instead of the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a previously stored hash
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Get the base64 string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// A derived AES-256 key, zeroed when dropped
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; KEY_LENGTH],
}

impl SymmetricKey {
    /// Use raw key bytes directly, bypassing derivation
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// PBKDF2 parameters for both derivation passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDeriver {
    iterations: u32,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

impl KeyDeriver {
    /// Create a deriver with a custom iteration count
    ///
    /// Keys derived with a non-default count are not interchangeable with
    /// keys derived elsewhere with the default.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Get the iteration count
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Stretch a password into the base64 hash that is persisted at login
    pub fn hash_password(&self, password: &str, salt: &str) -> PasswordHash {
        let mut raw = self.derive(password.as_bytes(), salt.as_bytes());
        let encoded = STANDARD.encode(raw);
        raw.zeroize();
        PasswordHash(encoded)
    }

    /// Derive the session key from a stored password hash
    ///
    /// The hash is not validated; any string is accepted.
    pub fn create_key(&self, hash: &str, account_id: &str, salt: &str) -> SymmetricKey {
        let mut material = format!("{}:{}", account_id, hash);
        let key = self.derive(material.as_bytes(), salt.as_bytes());
        material.zeroize();
        SymmetricKey { key }
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> [u8; KEY_LENGTH] {
        let mut key = [0u8; KEY_LENGTH];
        pbkdf2_hmac::<Sha1>(password, salt, self.iterations, &mut key);
        key
    }
}

/// Hash a password with the default parameters
pub fn hash_password(password: &str, salt: &str) -> PasswordHash {
    KeyDeriver::default().hash_password(password, salt)
}

/// Derive a session key with the default parameters
pub fn create_key(hash: &str, account_id: &str, salt: &str) -> SymmetricKey {
    KeyDeriver::default().create_key(hash, account_id, salt)
}
