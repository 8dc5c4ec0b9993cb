//! AES-256-CBC payload encryption for request parameters and responses.
//!
//! # Wire Format
//!
//! ```text
//! <hex(iv)>:<hex(ciphertext)>
//! ```
//!
//! The IV is 16 random bytes generated per call. The ciphertext is PKCS#7
//! padded. Decryption splits on the first `:` only; the hex alphabet never
//! contains the separator, so anything after a second `:` is rejected as
//! invalid hex.
//!
//! CBC carries no authentication tag. A wrong key usually fails the padding
//! check; the UTF-8 and JSON checks on the plaintext catch the remainder.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of the initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Separator between the hex IV and the hex ciphertext.
pub const SEPARATOR: char = ':';

/// Encryption error types.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("invalid encrypted payload: missing ':' separator")]
    MissingSeparator,
    #[error("invalid encrypted payload: empty initialization vector")]
    EmptyIv,
    #[error("invalid hex in {part}: {reason}")]
    InvalidHex { part: &'static str, reason: String },
    #[error("initialization vector must be 16 bytes, got {0}")]
    InvalidIvLength(usize),
    #[error("decryption failed: {0}")]
    Decrypt(String),
    #[error("decrypted payload is not valid UTF-8")]
    Utf8,
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Symmetric cipher bound to one request's key.
///
/// Built per request from the signing material and dropped with it; the key
/// is zeroized on drop.
///
/// # Example
///
/// ```
/// use zerod_client::cipher::PayloadCipher;
///
/// let cipher = PayloadCipher::from_secret("f00dfeed");
/// let payload = cipher.encrypt(br#"{"a":1}"#);
/// assert_eq!(cipher.decrypt_to_string(&payload).unwrap(), r#"{"a":1}"#);
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PayloadCipher {
    key: [u8; KEY_SIZE],
}

impl PayloadCipher {
    /// Create a cipher from a raw 256-bit key.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Create a cipher whose key is the SHA-256 digest of `secret`.
    ///
    /// This is how the deployed front end turns the signature string into an
    /// AES key.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt `plaintext` under a fresh random IV.
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);
        self.encrypt_with_iv(plaintext, &iv)
    }

    /// Encrypt `plaintext` under a caller-supplied IV.
    ///
    /// Only useful for fixed test vectors; reusing an IV with the same key
    /// leaks plaintext prefixes.
    pub fn encrypt_with_iv(&self, plaintext: &[u8], iv: &[u8; IV_SIZE]) -> String {
        let cipher = Aes256CbcEnc::new(&self.key.into(), &(*iv).into());
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut out = String::with_capacity(IV_SIZE * 2 + 1 + ciphertext.len() * 2);
        out.push_str(&hex::encode(iv));
        out.push(SEPARATOR);
        out.push_str(&hex::encode(&ciphertext));
        out
    }

    /// Decrypt a `ivHex:cipherHex` payload.
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// - `MissingSeparator` / `EmptyIv` for structurally malformed input
    /// - `InvalidHex` / `InvalidIvLength` for bad encodings
    /// - `Decrypt` when the padding check fails
    ///
    /// CBC has no authentication. A wrong key or tampered ciphertext still
    /// passes the padding check for a small fraction of inputs (about 1 in
    /// 256) and then yields garbage bytes. Callers must validate the
    /// plaintext, as [`decrypt_to_string`](Self::decrypt_to_string) does for
    /// UTF-8 and the client does for JSON.
    pub fn decrypt(&self, payload: &str) -> CipherResult<Vec<u8>> {
        let (iv_hex, cipher_hex) = payload
            .trim()
            .split_once(SEPARATOR)
            .ok_or(CipherError::MissingSeparator)?;

        if iv_hex.is_empty() {
            return Err(CipherError::EmptyIv);
        }

        let iv_bytes = hex::decode(iv_hex).map_err(|e| CipherError::InvalidHex {
            part: "iv",
            reason: e.to_string(),
        })?;
        let iv: [u8; IV_SIZE] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CipherError::InvalidIvLength(iv_bytes.len()))?;

        let ciphertext = hex::decode(cipher_hex).map_err(|e| CipherError::InvalidHex {
            part: "ciphertext",
            reason: e.to_string(),
        })?;

        let cipher = Aes256CbcDec::new(&self.key.into(), &iv.into());
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CipherError::Decrypt("invalid padding (wrong key or tampered data)".into()))
    }

    /// Decrypt a payload and interpret the plaintext as UTF-8.
    pub fn decrypt_to_string(&self, payload: &str) -> CipherResult<String> {
        let plaintext = self.decrypt(payload)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::Utf8)
    }
}

impl std::fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadCipher").finish_non_exhaustive()
    }
}
