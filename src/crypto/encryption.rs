//! AES-256-CBC encryption/decryption
//!
//! A [`CipherBox`] holds one session key and turns payloads into envelope
//! strings and back. A fresh cipher is built for every call from the held
//! key and a per-call IV, so one box can be shared across threads.
//!
//! CBC is unauthenticated. Tampering is detected only when it breaks the
//! padding or the UTF-8 of the recovered text.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, Iv, Key, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use crate::error::{CryptError, CryptResult};

use super::envelope::{EncryptedEnvelope, IV_SIZE};
use super::key_derivation::{KeyDeriver, SymmetricKey};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Symmetric encryption under one pre-derived key
pub struct CipherBox {
    key: SymmetricKey,
}

impl CipherBox {
    /// Create a box around a derived key
    pub fn new(key: SymmetricKey) -> Self {
        Self { key }
    }

    /// Derive the session key from stored credentials and wrap it
    ///
    /// Blocks for the full PBKDF2 derivation.
    pub fn from_credentials(hash: &str, account_id: &str, salt: &str) -> Self {
        Self::new(KeyDeriver::default().create_key(hash, account_id, salt))
    }

    /// Encrypt bytes into an envelope string
    ///
    /// Draws a fresh random IV on every call, so encrypting the same data
    /// twice gives two different envelopes.
    pub fn encrypt(&self, data: &[u8]) -> String {
        let mut iv = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut iv);
        self.seal(iv, data).to_string()
    }

    /// Encrypt the UTF-8 bytes of a string
    pub fn encrypt_string(&self, text: &str) -> String {
        self.encrypt(text.as_bytes())
    }

    /// Encrypt an optional string, passing `None` through
    pub fn encrypt_optional(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.encrypt_string(t))
    }

    /// Decrypt an envelope back into bytes
    pub fn decrypt_data(&self, envelope: &str) -> CryptResult<Vec<u8>> {
        let envelope: EncryptedEnvelope = envelope.parse()?;
        self.open(&envelope)
    }

    /// Decrypt an envelope back into a UTF-8 string
    pub fn decrypt(&self, envelope: &str) -> CryptResult<String> {
        let plaintext = self.decrypt_data(envelope)?;
        String::from_utf8(plaintext)
            .map_err(|e| CryptError::decryption(format!("invalid UTF-8 in decrypted data: {}", e)))
    }

    /// Decrypt an optional envelope, passing `None` through
    pub fn decrypt_optional(&self, envelope: Option<&str>) -> CryptResult<Option<String>> {
        envelope.map(|e| self.decrypt(e)).transpose()
    }

    fn seal(&self, iv: [u8; IV_SIZE], data: &[u8]) -> EncryptedEnvelope {
        let ciphertext = Aes256CbcEnc::new(
            Key::<Aes256CbcEnc>::from_slice(self.key.as_bytes()),
            Iv::<Aes256CbcEnc>::from_slice(&iv),
        )
        .encrypt_padded_vec_mut::<Pkcs7>(data);
        EncryptedEnvelope::new(iv, ciphertext)
    }

    fn open(&self, envelope: &EncryptedEnvelope) -> CryptResult<Vec<u8>> {
        Aes256CbcDec::new(
            Key::<Aes256CbcDec>::from_slice(self.key.as_bytes()),
            Iv::<Aes256CbcDec>::from_slice(&envelope.iv),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
        .map_err(|_| CryptError::decryption("invalid key or corrupted data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::{create_key, hash_password};
    use base64::{engine::general_purpose::STANDARD, Engine};

    fn test_box() -> CipherBox {
        CipherBox::new(SymmetricKey::from_bytes([7u8; 32]))
    }

    #[test]
    fn test_encrypt_decrypt_string() {
        let cipher = test_box();
        let envelope = cipher.encrypt_string("Hello, World!");
        assert_eq!(cipher.decrypt(&envelope).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_round_trip_edge_strings() {
        let cipher = test_box();
        for text in [
            "",
            "line one\nline two\r\nline three",
            "émoji 🔐 and 中文 and \u{0000} nul",
            "exactly sixteen!",
        ] {
            let envelope = cipher.encrypt_string(text);
            assert_eq!(cipher.decrypt(&envelope).unwrap(), text);
        }
    }

    #[test]
    fn test_encrypt_decrypt_bytes() {
        let cipher = test_box();
        let plaintext: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
        let envelope = cipher.encrypt(&plaintext);
        assert_eq!(cipher.decrypt_data(&envelope).unwrap(), plaintext);
    }

    #[test]
    fn test_envelope_shape() {
        let cipher = test_box();
        let envelope: EncryptedEnvelope = cipher.encrypt_string("abc").parse().unwrap();
        assert_eq!(envelope.ciphertext.len(), 16);

        let envelope: EncryptedEnvelope =
            cipher.encrypt_string("exactly sixteen!").parse().unwrap();
        assert_eq!(envelope.ciphertext.len(), 32);
    }

    #[test]
    fn test_known_answer() {
        // NIST SP 800-38A F.2.5 CBC-AES256 first block, plus a full padding block
        let key: [u8; 32] = [
            0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d,
            0x77, 0x81, 0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3,
            0x09, 0x14, 0xdf, 0xf4,
        ];
        let iv: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let plaintext: [u8; 16] = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a,
        ];
        let expected: [u8; 16] = [
            0xf5, 0x8c, 0x4c, 0x04, 0xd6, 0xe5, 0xf1, 0xba, 0x77, 0x9e, 0xab, 0xfb, 0x5f, 0x7b,
            0xfb, 0xd6,
        ];

        let cipher = CipherBox::new(SymmetricKey::from_bytes(key));
        let envelope = cipher.seal(iv, &plaintext);
        assert_eq!(&envelope.ciphertext[..16], &expected);
        assert_eq!(cipher.decrypt_data(&envelope.to_string()).unwrap(), plaintext);
    }

    #[test]
    fn test_different_ivs() {
        let cipher = test_box();
        let first = cipher.encrypt_string("Hello, World!");
        let second = cipher.encrypt_string("Hello, World!");

        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), "Hello, World!");
        assert_eq!(cipher.decrypt(&second).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_optional_passthrough() {
        let cipher = test_box();
        assert_eq!(cipher.encrypt_optional(None), None);
        assert_eq!(cipher.decrypt_optional(None).unwrap(), None);

        let envelope = cipher.encrypt_optional(Some("text"));
        assert_eq!(
            cipher.decrypt_optional(envelope.as_deref()).unwrap().as_deref(),
            Some("text")
        );
    }

    #[test]
    fn test_wrong_key_fails() {
        let cipher = test_box();
        let other = CipherBox::new(SymmetricKey::from_bytes([8u8; 32]));
        let envelope = cipher.encrypt_string("a message long enough to span three AES blocks");

        let result = other.decrypt(&envelope);
        assert!(result.unwrap_err().is_decryption());
    }

    #[test]
    fn test_tampered_padding_block_fails() {
        let cipher = test_box();
        let mut envelope: EncryptedEnvelope = cipher
            .encrypt_string("twenty bytes of text")
            .parse()
            .unwrap();

        // The last byte of the previous block feeds straight into the pad byte
        let index = envelope.ciphertext.len() - IV_SIZE - 1;
        envelope.ciphertext[index] ^= 0x80;

        let result = cipher.decrypt_data(&envelope.to_string());
        assert!(result.unwrap_err().is_decryption());
    }

    #[test]
    fn test_tampered_iv_on_single_block_fails() {
        let cipher = test_box();
        let mut envelope: EncryptedEnvelope = cipher.encrypt_string("short").parse().unwrap();
        envelope.iv[IV_SIZE - 1] ^= 0x80;

        assert!(cipher.decrypt_data(&envelope.to_string()).is_err());
    }

    #[test]
    fn test_truncated_envelope_fails() {
        let cipher = test_box();
        let envelope = cipher.encrypt_string("Hello, World!");

        let truncated = &envelope[..envelope.len() - 1];
        assert!(cipher.decrypt(truncated).unwrap_err().is_decryption());

        let (iv, ciphertext) = envelope.split_once("-:-").unwrap();
        let mut bytes = STANDARD.decode(ciphertext).unwrap();
        bytes.truncate(bytes.len() - 1);
        let short = format!("{}-:-{}", iv, STANDARD.encode(bytes));
        assert!(cipher.decrypt(&short).unwrap_err().is_decryption());
    }

    #[test]
    fn test_missing_delimiter_fails() {
        let cipher = test_box();
        let envelope = cipher.encrypt_string("Hello, World!").replace("-:-", "");
        assert!(cipher.decrypt(&envelope).unwrap_err().is_decryption());
    }

    #[test]
    fn test_derived_key_round_trip() {
        let hash = hash_password("password", "abcdefghijklmnopqrstuvwxyz");
        let key = create_key(hash.as_str(), "aabss-fjfj11-jfjf00-jj", "zyxwvutsrqponmlkjihgfedcba");
        let cipher = CipherBox::new(key);
        let envelope = cipher.encrypt_string("synced message");

        let again = CipherBox::from_credentials(
            hash.as_str(),
            "aabss-fjfj11-jfjf00-jj",
            "zyxwvutsrqponmlkjihgfedcba",
        );
        assert_eq!(again.decrypt(&envelope).unwrap(), "synced message");
    }

    #[test]
    fn test_shared_across_threads() {
        let cipher = std::sync::Arc::new(test_box());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cipher = cipher.clone();
                std::thread::spawn(move || {
                    let text = format!("message {}", i);
                    let envelope = cipher.encrypt_string(&text);
                    assert_eq!(cipher.decrypt(&envelope).unwrap(), text);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
