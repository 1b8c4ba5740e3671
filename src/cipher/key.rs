// Cardvault — Key Sources
//
// Supplies the single 256-bit PAN encryption key. Two production sources:
//   - `EnvKeySource`     — a hex key in an environment variable
//   - `KeyringKeySource` — the platform keyring (Keychain/Credential Manager/
//                          kernel keyutils); a random key is generated on first use
//
// Key bytes only ever live in `Zeroizing` buffers and are never logged.

use rand::RngCore;
use zeroize::Zeroizing;

use super::{CipherError, KeyError, PanCipher};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Length of the PAN encryption key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Service name used to identify Cardvault entries in the platform keyring.
const KEYRING_SERVICE: &str = "cardvault";

/// Username for the keyring entry holding the PAN key.
const KEYRING_USER: &str = "pan-encryption-key";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over where the process-wide PAN key comes from.
pub trait KeySource {
    /// Load the key bytes. Sources that can create a key do so on first use.
    fn load_key(&self) -> Result<Zeroizing<Vec<u8>>, KeyError>;

    /// Check whether a key is already available without creating one.
    fn has_key(&self) -> Result<bool, KeyError>;

    /// Load the key and build a cipher from it, failing fast on a bad key.
    fn cipher(&self) -> Result<PanCipher, KeyError> {
        let key = self.load_key()?;
        Ok(PanCipher::new(&key)?)
    }
}

/// Generate a fresh random 256-bit key.
pub fn generate_key() -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; KEY_LEN]);
    rand::rng().fill_bytes(&mut key);
    key
}

fn check_len(key: &[u8]) -> Result<(), KeyError> {
    if key.len() != KEY_LEN {
        return Err(KeyError::Cipher(CipherError::InvalidKey {
            expected: KEY_LEN,
            actual: key.len(),
        }));
    }
    Ok(())
}

// ─── Environment ─────────────────────────────────────────────────────────────

/// Reads a hex-encoded key from an environment variable.
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

impl KeySource for EnvKeySource {
    fn load_key(&self) -> Result<Zeroizing<Vec<u8>>, KeyError> {
        let hex_key = Zeroizing::new(
            std::env::var(&self.var).map_err(|_| KeyError::NotFound(self.var.clone()))?,
        );

        // The error names the variable, never its value.
        let key = Zeroizing::new(
            hex::decode(hex_key.trim())
                .map_err(|_| KeyError::InvalidEncoding(format!("{} is not valid hex", self.var)))?,
        );
        check_len(&key)?;

        tracing::debug!(var = %self.var, "Loaded PAN key from environment");
        Ok(key)
    }

    fn has_key(&self) -> Result<bool, KeyError> {
        Ok(std::env::var_os(&self.var).is_some())
    }
}

// ─── Platform Keyring ────────────────────────────────────────────────────────

/// Stores the PAN key in the platform's native keyring.
pub struct KeyringKeySource {
    service: String,
    user: String,
}

impl KeyringKeySource {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, KeyError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| KeyError::Keyring(format!("failed to create keyring entry: {}", e)))
    }
}

impl Default for KeyringKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for KeyringKeySource {
    fn load_key(&self) -> Result<Zeroizing<Vec<u8>>, KeyError> {
        let entry = self.entry()?;

        match entry.get_secret() {
            Ok(secret) => {
                let key = Zeroizing::new(secret);
                check_len(&key)?;
                tracing::debug!("Retrieved PAN key from keyring");
                Ok(key)
            }
            Err(keyring::Error::NoEntry) => {
                tracing::info!("No PAN key found in keyring, generating a new one");
                let key = generate_key();
                entry
                    .set_secret(&key)
                    .map_err(|e| KeyError::Keyring(format!("failed to store PAN key: {}", e)))?;
                tracing::info!("PAN key stored in platform keyring");
                Ok(key)
            }
            Err(e) => Err(KeyError::Keyring(format!(
                "failed to retrieve PAN key: {}",
                e
            ))),
        }
    }

    fn has_key(&self) -> Result<bool, KeyError> {
        let entry = self.entry()?;
        match entry.get_secret() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(KeyError::Keyring(format!("failed to check PAN key: {}", e))),
        }
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────

/// Keeps the key in memory so tests never touch the real keyring.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    pub struct MockKeySource {
        key: Mutex<Option<Vec<u8>>>,
    }

    impl MockKeySource {
        pub fn new() -> Self {
            Self {
                key: Mutex::new(None),
            }
        }

        /// Create a mock pre-loaded with a known key (of any length).
        pub fn with_key(key: Vec<u8>) -> Self {
            Self {
                key: Mutex::new(Some(key)),
            }
        }
    }

    impl KeySource for MockKeySource {
        fn load_key(&self) -> Result<Zeroizing<Vec<u8>>, KeyError> {
            let mut guard = self.key.lock().unwrap();
            let key = guard.get_or_insert_with(|| generate_key().to_vec());
            Ok(Zeroizing::new(key.clone()))
        }

        fn has_key(&self) -> Result<bool, KeyError> {
            Ok(self.key.lock().unwrap().is_some())
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
