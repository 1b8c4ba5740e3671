// Cardvault — Top-level error types
//
// Aggregates errors from the cipher, store, and vault modules into a single
// error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Cardvault operations.
#[derive(Debug, Error)]
pub enum CardVaultError {
    #[error("Cipher error: {0}")]
    Cipher(#[from] crate::cipher::CipherError),

    #[error("Key error: {0}")]
    Key(#[from] crate::cipher::KeyError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Vault(#[from] crate::vault::VaultError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CardVaultError>;
