// Cardvault — Library root
//
// Re-exports the cipher, store, vault, config, and CLI modules.

pub mod cipher;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod vault;

pub use cipher::{CipherError, PanCipher};
pub use error::{CardVaultError, Result};
pub use store::{CardRecord, CardStore, Database, NewCard, SqliteCardStore};
pub use vault::{SearchResult, Vault, VaultError};
