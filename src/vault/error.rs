// Cardvault — Vault error types
//
// Messages never include a PAN, not even a masked one.

use thiserror::Error;

use crate::cipher::CipherError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Card with that PAN already exists")]
    DuplicateCard,

    #[error("PAN must not be empty")]
    EmptyPan,

    #[error("Search suffix must be exactly {expected} digits")]
    InvalidSuffix { expected: usize },

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
