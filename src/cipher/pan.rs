// Cardvault — PAN Cipher
//
// Encrypts a single string field with AES-256-GCM under a fixed 32-byte key.
// Every call draws a fresh 96-bit nonce, so encrypting the same PAN twice
// yields different ciphertexts. Callers must never compare ciphertexts to
// test plaintext equality.
//
// Stored form: base64(nonce || ciphertext || tag), standard alphabet, padded.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use zeroize::Zeroizing;

use super::key::KEY_LEN;
use super::CipherError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Length of the AES-GCM nonce prefixed to every ciphertext.
const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag appended by `aes-gcm`.
const TAG_LEN: usize = 16;

// ─── Cipher ──────────────────────────────────────────────────────────────────

/// Authenticated encryption of account numbers under one process-wide key.
#[derive(Clone)]
pub struct PanCipher {
    cipher: Aes256Gcm,
}

impl PanCipher {
    /// Build a cipher from raw key bytes. The key must be exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKey {
                expected: KEY_LEN,
                actual: key.len(),
            });
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKey {
            expected: KEY_LEN,
            actual: key.len(),
        })?;

        Ok(Self { cipher })
    }

    /// Build a cipher from a hex-encoded key (64 hex characters).
    pub fn from_hex(hex_key: &str) -> Result<Self, CipherError> {
        let hex_key = hex_key.trim();
        let bytes = Zeroizing::new(hex::decode(hex_key).map_err(|_| {
            CipherError::InvalidKeyEncoding {
                hex_chars: hex_key.chars().count(),
            }
        })?);
        Self::new(&bytes)
    }

    /// Encrypt a plaintext string into its storage-safe textual form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encryption)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);

        Ok(STANDARD.encode(out))
    }

    /// Decrypt a value produced by [`PanCipher::encrypt`].
    ///
    /// Fails with [`CipherError::Decryption`] on malformed base64, truncated
    /// input, authentication failure, or a plaintext that is not UTF-8.
    pub fn decrypt(&self, ciphertext: &str) -> Result<Zeroizing<String>, CipherError> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| CipherError::Decryption)?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Decryption);
        }

        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        let plaintext = Zeroizing::new(
            self.cipher
                .decrypt(Nonce::from_slice(nonce), sealed)
                .map_err(|_| CipherError::Decryption)?,
        );

        let text = std::str::from_utf8(&plaintext).map_err(|_| CipherError::Decryption)?;
        Ok(Zeroizing::new(text.to_owned()))
    }
}

/// Never reveals key material.
impl fmt::Debug for PanCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanCipher")
            .field("algorithm", &"AES-256-GCM")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
