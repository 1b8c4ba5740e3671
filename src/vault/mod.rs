// Cardvault — Vault Module
//
// The caller-facing operations: add a card (rejecting a PAN that is already
// stored) and search by the last four digits of the PAN. Uniqueness is
// checked on decrypted plaintexts because ciphertexts are randomized.

mod error;
mod mask;
mod service;

pub use error::VaultError;
pub use mask::{format_created_at, mask_pan, UNKNOWN_TIMESTAMP, UNREADABLE_PAN};
pub use service::{MatchStatus, SearchResult, Vault, SUFFIX_LEN};
