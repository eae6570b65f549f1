//! msgcrypt - end-to-end encryption for cloud-synced messages
//!
//! A password is stretched once at login into a persisted hash; each session
//! re-derives an AES-256 key from that hash, the account id and a second salt,
//! and encrypts message bodies into `<iv>-:-<ciphertext>` envelopes that the
//! sync layer stores as opaque strings.
//!
//! # Architecture
//!
//! - `crypto`: key derivation, AES-CBC cipher, envelope format
//! - `services`: login / logout / session keys on top of stored settings
//! - `config`: path resolution and the JSON settings file
//! - `storage`: atomic JSON file helpers
//! - `retry`: bounded retry with linear backoff for sync calls
//! - `media`: ordered link classifiers for message previews
//! - `cli`: command handlers for the `msgcrypt` binary
//!
//! # Example
//!
//! ```rust
//! use msgcrypt::crypto::{create_key, hash_password, CipherBox};
//!
//! let hash = hash_password("password", "abcdefghijklmnopqrstuvwxyz");
//! let key = create_key(hash.as_str(), "aabss-fjfj11-jfjf00-jj", "zyxwvutsrqponmlkjihgfedcba");
//! let cipher = CipherBox::new(key);
//!
//! let envelope = cipher.encrypt_string("hello");
//! assert_eq!(cipher.decrypt(&envelope).unwrap(), "hello");
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod media;
pub mod retry;
pub mod services;
pub mod storage;

pub use error::{CryptError, CryptResult};
