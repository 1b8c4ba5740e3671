// Cardvault — SQLite Database Management
//
// Opens the card database and runs schema migrations. PANs are encrypted at
// the field level before they reach this layer, so the file itself is plain
// SQLite. The connection sits behind a mutex so one database can be shared
// by concurrent request handlers. Other processes opening the same file wait
// up to BUSY_TIMEOUT for a writer to finish instead of failing at once.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;

use super::StoreError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Wrapper around a mutex-guarded SQLite connection.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;

        tracing::debug!(path = %path.display(), "Card database opened");
        Ok(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Lock and borrow the underlying connection.
    ///
    /// The guard must be dropped before calling back into the store.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave a half-applied SQL
        // statement behind, so the connection is still usable.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run schema migrations to create or update tables.
    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn().execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cards (
                id                  TEXT PRIMARY KEY,
                cardholder_name     TEXT NOT NULL,
                pan_ciphertext      TEXT NOT NULL,
                created_at          TEXT NOT NULL
            );
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
