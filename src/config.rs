// Cardvault — Runtime configuration
//
// Everything comes from the environment, with defaults under the platform
// data directory:
//   CARDVAULT_DB   — database path (default: <data_dir>/cardvault/cardvault.db)
//   CARDVAULT_KEY  — hex PAN key; when unset the platform keyring is used

use std::path::PathBuf;

use crate::cipher::{EnvKeySource, KeySource, KeyringKeySource};

pub const DB_PATH_VAR: &str = "CARDVAULT_DB";
pub const KEY_VAR: &str = "CARDVAULT_KEY";

/// Where the PAN key is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySourceKind {
    Env,
    Keyring,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub key_source: KeySourceKind,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var_os(DB_PATH_VAR).map(PathBuf::from),
            std::env::var_os(KEY_VAR).is_some(),
        )
    }

    fn resolve(db_override: Option<PathBuf>, env_key_present: bool) -> Self {
        let db_path = db_override.unwrap_or_else(|| data_dir().join("cardvault.db"));
        let key_source = if env_key_present {
            KeySourceKind::Env
        } else {
            KeySourceKind::Keyring
        };
        Self {
            db_path,
            key_source,
        }
    }

    pub fn key_source(&self) -> Box<dyn KeySource> {
        match self.key_source {
            KeySourceKind::Env => Box::new(EnvKeySource::new(KEY_VAR)),
            KeySourceKind::Keyring => Box::new(KeyringKeySource::new()),
        }
    }
}

/// Default directory for Cardvault data files.
fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("cardvault")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_data_dir_and_keyring() {
        let settings = Settings::resolve(None, false);
        assert!(settings.db_path.ends_with("cardvault/cardvault.db"));
        assert_eq!(settings.key_source, KeySourceKind::Keyring);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let settings = Settings::resolve(Some(PathBuf::from("/tmp/cards.db")), true);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/cards.db"));
        assert_eq!(settings.key_source, KeySourceKind::Env);
    }
}
