// Cardvault — PAN masking and display helpers

use chrono::{DateTime, Utc};

/// Shown in place of a masked PAN when a record cannot be decrypted.
pub const UNREADABLE_PAN: &str = "ERROR";

/// Shown in place of the creation time when a record cannot be decrypted.
pub const UNKNOWN_TIMESTAMP: &str = "N/A";

const MASK_PREFIX: &str = "**** **** ";
const VISIBLE_DIGITS: usize = 4;
const CREATED_AT_FORMAT: &str = "%d %b %Y, %H:%M:%S";

/// Mask a PAN down to its last four characters, e.g. `**** **** 1234`.
///
/// Works on characters, not bytes. A PAN shorter than four characters keeps
/// whatever it has.
pub fn mask_pan(pan: &str) -> String {
    let total = pan.chars().count();
    let last: String = pan.chars().skip(total.saturating_sub(VISIBLE_DIGITS)).collect();
    format!("{}{}", MASK_PREFIX, last)
}

/// Human-readable creation time, e.g. `05 Mar 2024, 14:07:09`.
pub fn format_created_at(ts: &DateTime<Utc>) -> String {
    ts.format(CREATED_AT_FORMAT).to_string()
}
