//! Encrypted envelope wire format
//!
//! An envelope is `<base64 IV>-:-<base64 ciphertext>`. Sync and storage
//! layers treat it as an opaque string.
//!
//! The standard base64 alphabet never produces `-` or `:`, so splitting on
//! the first delimiter is unambiguous for envelopes produced here.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::CryptError;

/// Separator between the IV and ciphertext segments
pub const ENVELOPE_DELIMITER: &str = "-:-";

/// AES block size, and therefore the CBC IV size, in bytes
pub const IV_SIZE: usize = 16;

/// IV and ciphertext of one encryption call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    pub iv: [u8; IV_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    pub fn new(iv: [u8; IV_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }
}

impl fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            STANDARD.encode(self.iv),
            ENVELOPE_DELIMITER,
            STANDARD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedEnvelope {
    type Err = CryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_b64, ciphertext_b64) = s
            .split_once(ENVELOPE_DELIMITER)
            .ok_or_else(|| CryptError::decryption("envelope is missing the IV delimiter"))?;

        let iv_bytes = decode_segment(iv_b64, "IV")?;
        let iv: [u8; IV_SIZE] = iv_bytes.as_slice().try_into().map_err(|_| {
            CryptError::decryption(format!(
                "invalid IV size: expected {}, got {}",
                IV_SIZE,
                iv_bytes.len()
            ))
        })?;

        let ciphertext = decode_segment(ciphertext_b64, "ciphertext")?;

        Ok(Self { iv, ciphertext })
    }
}

/// Decode one base64 segment, ignoring line wrapping
fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>, CryptError> {
    let compact: String = segment
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| CryptError::decryption(format!("invalid {} encoding: {}", what, e)))
}
