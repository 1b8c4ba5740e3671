// Cardvault — Card data models
//
// SECURITY: `CardRecord` carries the PAN only as ciphertext, and `NewCard`
// carries the caller's plaintext PAN in a zeroizing buffer. Neither type
// prints the PAN field in Debug or Display output.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

/// A persisted card record. Created only by the vault, never mutated.
#[derive(Clone)]
pub struct CardRecord {
    pub id: Uuid,
    pub cardholder_name: String,
    /// Encrypted PAN as produced by `PanCipher::encrypt`.
    pan_ciphertext: String,
    pub created_at: DateTime<Utc>,
}

impl CardRecord {
    pub fn new(
        id: Uuid,
        cardholder_name: String,
        pan_ciphertext: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            cardholder_name,
            pan_ciphertext,
            created_at,
        }
    }

    /// The encrypted PAN. Only the vault's cipher can turn this back into a PAN.
    pub fn pan_ciphertext(&self) -> &str {
        &self.pan_ciphertext
    }
}

impl fmt::Debug for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardRecord")
            .field("id", &self.id)
            .field("cardholder_name", &self.cardholder_name)
            .field("pan_ciphertext", &"[ENCRYPTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (added {})",
            self.id,
            self.cardholder_name,
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Input for `Vault::add`. The caller supplies only a name and a PAN;
/// the id and creation time are assigned by the vault.
pub struct NewCard {
    pub cardholder_name: String,
    pan: Zeroizing<String>,
}

impl NewCard {
    pub fn new(cardholder_name: impl Into<String>, pan: impl Into<String>) -> Self {
        Self {
            cardholder_name: cardholder_name.into(),
            pan: Zeroizing::new(pan.into()),
        }
    }

    /// The plaintext PAN. Never log or display this.
    pub fn pan(&self) -> &str {
        &self.pan
    }
}

impl fmt::Debug for NewCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCard")
            .field("cardholder_name", &self.cardholder_name)
            .field("pan", &"[REDACTED]")
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_debug_redacts_pan() {
        let card = NewCard::new("Alice", "4111111111111234");
        let debug_output = format!("{:?}", card);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("Alice"));
        assert!(
            !debug_output.contains("4111111111111234"),
            "Debug output must NEVER contain the raw PAN"
        );
        assert_eq!(card.pan(), "4111111111111234");
    }

    #[test]
    fn test_card_record_debug_hides_ciphertext() {
        let record = CardRecord::new(
            Uuid::new_v4(),
            "Bob".to_string(),
            "c2VhbGVkLWJsb2I=".to_string(),
            Utc::now(),
        );

        let debug_output = format!("{:?}", record);
        assert!(debug_output.contains("[ENCRYPTED]"));
        assert!(!debug_output.contains("c2VhbGVkLWJsb2I="));
        assert_eq!(record.pan_ciphertext(), "c2VhbGVkLWJsb2I=");
    }

    #[test]
    fn test_card_record_display_shows_name_and_id() {
        let id = Uuid::new_v4();
        let record = CardRecord::new(id, "Carol".to_string(), "blob".to_string(), Utc::now());

        let display_output = format!("{}", record);
        assert!(display_output.contains("Carol"));
        assert!(display_output.contains(&id.to_string()));
        assert!(!display_output.contains("blob"));
    }
}
