// Cardvault — Vault Service
//
// Two operations over an injected card store:
//
//   add            — scan every record, decrypt, reject on an exact plaintext
//                    match, otherwise encrypt and insert. The store runs the
//                    scan and insert as one exclusive write, so two adds of the
//                    same PAN cannot both succeed, even from separate vaults
//                    or processes sharing the database.
//   find_by_suffix — scan every record, decrypt, keep those whose PAN ends
//                    with the suffix, and return them masked. Records that
//                    fail to decrypt are returned as sentinel entries.
//
// Decryption failures are per-record outcomes, never a reason to abort a
// scan. Each one is counted in `integrity_warnings()`.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::mask::{format_created_at, mask_pan, UNKNOWN_TIMESTAMP, UNREADABLE_PAN};
use super::VaultError;
use crate::cipher::{CipherError, PanCipher};
use crate::store::{CardRecord, CardStore, NewCard};

/// Number of characters a search suffix must have.
pub const SUFFIX_LEN: usize = 4;

/// Outcome for one record in a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// The PAN decrypted and ends with the requested suffix.
    Matched,
    /// The PAN could not be decrypted; masked PAN and timestamp are sentinels.
    Unreadable,
}

/// One entry of a suffix search. Never carries the full PAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub record_id: Uuid,
    pub cardholder_name: String,
    pub masked_pan: String,
    pub created_at: String,
    pub status: MatchStatus,
}

impl SearchResult {
    fn matched(record: &CardRecord, pan: &str) -> Self {
        Self {
            record_id: record.id,
            cardholder_name: record.cardholder_name.clone(),
            masked_pan: mask_pan(pan),
            created_at: format_created_at(&record.created_at),
            status: MatchStatus::Matched,
        }
    }

    fn unreadable(record: &CardRecord) -> Self {
        Self {
            record_id: record.id,
            cardholder_name: record.cardholder_name.clone(),
            masked_pan: UNREADABLE_PAN.to_string(),
            created_at: UNKNOWN_TIMESTAMP.to_string(),
            status: MatchStatus::Unreadable,
        }
    }
}

/// The encrypted card vault.
pub struct Vault<S> {
    store: S,
    cipher: PanCipher,
    integrity_warnings: AtomicU64,
}

impl<S: CardStore> Vault<S> {
    pub fn new(store: S, cipher: PanCipher) -> Self {
        Self {
            store,
            cipher,
            integrity_warnings: AtomicU64::new(0),
        }
    }

    /// Add a card, rejecting it if any stored record decrypts to the same PAN.
    ///
    /// Every stored record is decrypted, even after a duplicate is found, so
    /// `integrity_warnings()` reflects the whole collection.
    pub fn add(&self, card: NewCard) -> Result<CardRecord, VaultError> {
        if card.pan().is_empty() {
            return Err(VaultError::EmptyPan);
        }

        let mut scanned = 0usize;
        let mut unreadable = 0u64;

        let outcome = self.store.insert_exclusive(
            |existing: &[CardRecord]| -> Result<CardRecord, VaultError> {
                scanned = existing.len();
                let mut duplicate = false;

                for record in existing {
                    match self.open(record) {
                        Ok(pan) if pan.as_str() == card.pan() => duplicate = true,
                        Ok(_) => {}
                        Err(_) => unreadable += 1,
                    }
                }

                if duplicate {
                    return Err(VaultError::DuplicateCard);
                }

                Ok(CardRecord::new(
                    Uuid::new_v4(),
                    card.cardholder_name.clone(),
                    self.cipher.encrypt(card.pan())?,
                    Utc::now(),
                ))
            },
        );

        self.report_unreadable("add", unreadable);

        let record = match outcome {
            Err(VaultError::DuplicateCard) => {
                tracing::info!(scanned = scanned, "Rejected card: PAN already stored");
                return Err(VaultError::DuplicateCard);
            }
            other => other?,
        };

        tracing::info!(
            record_id = %record.id,
            scanned = scanned,
            "Card stored successfully"
        );

        Ok(record)
    }

    /// Find every card whose PAN ends with `suffix` (exactly four digits).
    ///
    /// Results follow the store's enumeration order. Records that cannot be
    /// decrypted are always included, as `Unreadable` entries, whatever the
    /// suffix.
    pub fn find_by_suffix(&self, suffix: &str) -> Result<Vec<SearchResult>, VaultError> {
        if suffix.len() != SUFFIX_LEN || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VaultError::InvalidSuffix {
                expected: SUFFIX_LEN,
            });
        }

        let records = self.store.scan_all()?;
        let mut results = Vec::new();
        let mut unreadable = 0u64;

        for record in &records {
            match self.open(record) {
                Ok(pan) if pan.ends_with(suffix) => {
                    results.push(SearchResult::matched(record, &pan));
                }
                Ok(_) => {}
                Err(_) => {
                    unreadable += 1;
                    results.push(SearchResult::unreadable(record));
                }
            }
        }

        self.report_unreadable("find_by_suffix", unreadable);
        tracing::debug!(
            scanned = records.len(),
            returned = results.len(),
            "Suffix search completed"
        );

        Ok(results)
    }

    /// Number of stored cards.
    pub fn record_count(&self) -> Result<usize, VaultError> {
        Ok(self.store.count()?)
    }

    /// Total records that failed to decrypt across all scans so far.
    pub fn integrity_warnings(&self) -> u64 {
        self.integrity_warnings.load(Ordering::Relaxed)
    }

    fn open(&self, record: &CardRecord) -> Result<Zeroizing<String>, CipherError> {
        self.cipher.decrypt(record.pan_ciphertext())
    }

    fn report_unreadable(&self, operation: &str, count: u64) {
        if count == 0 {
            return;
        }
        self.integrity_warnings.fetch_add(count, Ordering::Relaxed);
        // Either the key changed without re-encrypting or the stored data is corrupt.
        tracing::warn!(
            operation = operation,
            unreadable = count,
            "Stored card records could not be decrypted"
        );
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
