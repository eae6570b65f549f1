//! Cryptographic functions for msgcrypt
//!
//! Provides PBKDF2-HMAC-SHA1 key derivation and AES-256-CBC encryption of
//! message payloads into `<iv>-:-<ciphertext>` envelopes.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::CipherBox;
pub use envelope::{EncryptedEnvelope, ENVELOPE_DELIMITER};
pub use key_derivation::{
    create_key, hash_password, KeyDeriver, PasswordHash, SymmetricKey, PBKDF2_ITERATIONS,
};
pub use secure_memory::SecureString;
