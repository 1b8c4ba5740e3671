// Cardvault — Cipher error types
//
// No variant ever carries key material or plaintext.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    #[error("Invalid key: not a hex string ({hex_chars} characters)")]
    InvalidKeyEncoding { hex_chars: usize },

    #[error("Ciphertext could not be decrypted (malformed, truncated, tampered, or wrong key)")]
    Decryption,

    #[error("Encryption failed")]
    Encryption,
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("Encryption key not found: {0}")]
    NotFound(String),

    #[error("Encryption key has an invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error(transparent)]
    Cipher(#[from] CipherError),
}
