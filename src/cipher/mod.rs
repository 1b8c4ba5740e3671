// Cardvault — Cipher Module
//
// Field-level AES-256-GCM encryption of primary account numbers, plus the
// key sources that supply the single process-wide 256-bit key. The key is
// handed to the cipher at construction and never leaves zeroizing buffers.

mod error;
mod key;
mod pan;

pub use error::{CipherError, KeyError};
pub use key::{generate_key, EnvKeySource, KeySource, KeyringKeySource, KEY_LEN};
pub use pan::PanCipher;
