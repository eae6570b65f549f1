//! Encrypt, decrypt and hash commands
//!
//! Each invocation is a fresh session, so the session key is re-derived from
//! the stored credentials before any envelope is produced or opened.

use std::io::Read;

use tracing::debug;

use crate::config::{CryptPaths, Settings};
use crate::crypto::hash_password;
use crate::error::{CryptError, CryptResult};
use crate::services::AccountService;

use super::password::read_password;

/// Encrypt text (or stdin) with the stored account's key and print the envelope
pub fn handle_encrypt(
    paths: &CryptPaths,
    settings: &Settings,
    text: Option<String>,
) -> CryptResult<()> {
    let session = AccountService::new(paths).open_session(settings)?;
    let text = text_or_stdin(text)?;

    let envelope = session.encrypt_string(&text);
    debug!(plaintext_len = text.len(), envelope_len = envelope.len(), "encrypted");
    println!("{}", envelope);
    Ok(())
}

/// Decrypt an envelope (or stdin) with the stored account's key and print it
pub fn handle_decrypt(
    paths: &CryptPaths,
    settings: &Settings,
    envelope: Option<String>,
) -> CryptResult<()> {
    let session = AccountService::new(paths).open_session(settings)?;
    let envelope = text_or_stdin(envelope)?;

    let plaintext = session.decrypt(envelope.trim())?;
    println!("{}", plaintext);
    Ok(())
}

/// Print the password hash for a password and salt
pub fn handle_hash(salt: &str, password: Option<String>) -> CryptResult<()> {
    let password = read_password(password, "Password: ")?;
    println!("{}", hash_password(&password, salt).as_str());
    Ok(())
}

/// Use the argument unless it is absent or `-`, in which case read stdin
fn text_or_stdin(arg: Option<String>) -> CryptResult<String> {
    match arg {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CryptError::Io(format!("Failed to read stdin: {}", e)))?;
            if buf.ends_with('\n') {
                buf.pop();
            }
            Ok(buf)
        }
    }
}
