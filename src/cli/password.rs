//! Password input
//!
//! Passwords come from `MSGCRYPT_PASSWORD` when set, otherwise from a
//! hidden terminal prompt.

use crate::crypto::SecureString;
use crate::error::{CryptError, CryptResult};

/// Use the supplied password, or prompt for one
pub fn read_password(supplied: Option<String>, prompt: &str) -> CryptResult<SecureString> {
    match supplied {
        Some(password) => Ok(SecureString::new(password)),
        None => prompt_password(prompt),
    }
}

/// Use the supplied password, or prompt twice until both entries match
pub fn read_new_password(supplied: Option<String>) -> CryptResult<SecureString> {
    if let Some(password) = supplied {
        return Ok(SecureString::new(password));
    }

    loop {
        let first = prompt_password("New password: ")?;
        let second = prompt_password("Confirm password: ")?;

        if first.as_str() == second.as_str() {
            return Ok(first);
        }
        println!("Passwords do not match. Please try again.");
    }
}

fn prompt_password(prompt: &str) -> CryptResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| CryptError::Io(format!("Failed to read password: {}", e)))
}
