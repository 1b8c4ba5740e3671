// Cardvault — Card Store Repository
//
// The record collection the vault is built on: insert one record, scan every
// record in insertion order, or do both inside one write transaction so no
// other writer can slip a row in between. No update or delete exists; records
// are immutable once written.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, TransactionBehavior};
use uuid::Uuid;

use super::db::Database;
use super::models::CardRecord;
use super::StoreError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over card record persistence.
pub trait CardStore {
    /// Persist a fully-formed record. Either the whole row is written or nothing is.
    fn insert(&self, record: &CardRecord) -> Result<(), StoreError>;

    /// Return every stored record, in insertion order.
    fn scan_all(&self) -> Result<Vec<CardRecord>, StoreError>;

    /// Scan every record and insert the one `decide` builds from that
    /// snapshot. No other writer, through this handle or any other connection
    /// to the same database, can insert between the scan and the insert. An
    /// error from `decide` leaves the store untouched.
    fn insert_exclusive<E, F>(&self, decide: F) -> Result<CardRecord, E>
    where
        F: FnOnce(&[CardRecord]) -> Result<CardRecord, E>,
        E: From<StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.scan_all()?.len())
    }
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteCardStore<'a> {
    db: &'a Database,
}

impl<'a> SqliteCardStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Convert raw column values into a record, rejecting malformed ids or
    /// timestamps instead of inventing replacements.
    fn parse_row(
        id_str: String,
        cardholder_name: String,
        pan_ciphertext: String,
        created_at_str: String,
    ) -> Result<CardRecord, StoreError> {
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| StoreError::InvalidRow(format!("bad record id '{}': {}", id_str, e)))?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                StoreError::InvalidRow(format!("bad created_at for record {}: {}", id, e))
            })?;

        Ok(CardRecord::new(id, cardholder_name, pan_ciphertext, created_at))
    }
}

impl<'a> CardStore for SqliteCardStore<'a> {
    fn insert(&self, record: &CardRecord) -> Result<(), StoreError> {
        insert_row(&self.db.conn(), record)
    }

    fn scan_all(&self) -> Result<Vec<CardRecord>, StoreError> {
        scan_rows(&self.db.conn())
    }

    fn insert_exclusive<E, F>(&self, decide: F) -> Result<CardRecord, E>
    where
        F: FnOnce(&[CardRecord]) -> Result<CardRecord, E>,
        E: From<StoreError>,
    {
        // IMMEDIATE takes the write lock up front, so a second connection
        // (another process) blocks on BEGIN instead of scanning stale rows.
        let mut conn = self.db.conn();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;

        let existing = scan_rows(&tx)?;
        let record = decide(&existing)?;
        insert_row(&tx, &record)?;
        tx.commit().map_err(StoreError::from)?;

        Ok(record)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .db
            .conn()
            .query_row("SELECT count(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn insert_row(conn: &Connection, record: &CardRecord) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO cards (id, cardholder_name, pan_ciphertext, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            record.id.to_string(),
            record.cardholder_name,
            record.pan_ciphertext(),
            record.created_at.to_rfc3339(),
        ],
    )?;

    tracing::debug!(record_id = %record.id, "Card row inserted");
    Ok(())
}

fn scan_rows(conn: &Connection) -> Result<Vec<CardRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, cardholder_name, pan_ciphertext, created_at
         FROM cards ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, name, ciphertext, created_at) = row?;
        records.push(SqliteCardStore::parse_row(id, name, ciphertext, created_at)?);
    }
    Ok(records)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(name: &str, ciphertext: &str) -> CardRecord {
        CardRecord::new(
            Uuid::new_v4(),
            name.to_string(),
            ciphertext.to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_insert_then_scan_returns_identical_record() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);

        let original = record("Alice", "sealed-alice");
        store.insert(&original).unwrap();

        let all = store.scan_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, original.id);
        assert_eq!(all[0].cardholder_name, "Alice");
        assert_eq!(all[0].pan_ciphertext(), "sealed-alice");
        assert_eq!(
            all[0].created_at, original.created_at,
            "Timestamps must round-trip exactly"
        );
    }

    #[test]
    fn test_scan_empty_store() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);

        assert!(store.scan_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_scan_follows_insertion_order_not_timestamps() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);

        // Later rows carry earlier timestamps; order must still be by insertion.
        let now = Utc::now();
        let names = ["first", "second", "third"];
        for (i, name) in names.iter().enumerate() {
            let rec = CardRecord::new(
                Uuid::new_v4(),
                name.to_string(),
                format!("sealed-{}", name),
                now - Duration::minutes(i as i64),
            );
            store.insert(&rec).unwrap();
        }

        let scanned: Vec<String> = store
            .scan_all()
            .unwrap()
            .into_iter()
            .map(|r| r.cardholder_name)
            .collect();
        assert_eq!(scanned, names);
    }

    #[test]
    fn test_count_matches_scan_length() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);

        for name in ["a", "b", "c"] {
            store.insert(&record(name, "x")).unwrap();
        }
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.scan_all().unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_id_insert_fails_without_partial_row() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);

        let rec = record("Alice", "sealed");
        store.insert(&rec).unwrap();

        let err = store.insert(&rec).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_malformed_timestamp_is_reported_not_defaulted() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO cards (id, cardholder_name, pan_ciphertext, created_at)
                 VALUES (?1, 'Mallory', 'x', 'yesterday')",
                params![Uuid::new_v4().to_string()],
            )
            .unwrap();

        let store = SqliteCardStore::new(&db);
        assert!(matches!(store.scan_all(), Err(StoreError::InvalidRow(_))));
    }

    #[test]
    fn test_malformed_id_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO cards (id, cardholder_name, pan_ciphertext, created_at)
                 VALUES ('not-a-uuid', 'Mallory', 'x', ?1)",
                params![Utc::now().to_rfc3339()],
            )
            .unwrap();

        let store = SqliteCardStore::new(&db);
        let err = store.scan_all().unwrap_err();
        assert!(err.to_string().contains("not-a-uuid"));
    }

    #[test]
    fn test_insert_exclusive_decides_on_current_snapshot() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);
        store.insert(&record("Alice", "sealed-alice")).unwrap();

        let inserted = store
            .insert_exclusive(|existing| {
                assert_eq!(existing.len(), 1);
                assert_eq!(existing[0].cardholder_name, "Alice");
                Ok::<_, StoreError>(record("Bob", "sealed-bob"))
            })
            .unwrap();

        let all = store.scan_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, inserted.id);
    }

    #[test]
    fn test_insert_exclusive_rejection_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteCardStore::new(&db);

        let err = store
            .insert_exclusive(|_| Err(StoreError::InvalidRow("rejected".to_string())))
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidRow(_)));
        assert_eq!(store.count().unwrap(), 0, "A rejected insert must leave no row");
    }

    #[test]
    fn test_insert_exclusive_serializes_separate_connections() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("cards.db");

        // Two handles on one file behave like two processes.
        let first = Database::open(&db_path).unwrap();
        let second = Database::open(&db_path).unwrap();

        let insert_if_empty = |db: &Database| {
            SqliteCardStore::new(db).insert_exclusive(|existing| {
                std::thread::sleep(std::time::Duration::from_millis(50));
                if existing.is_empty() {
                    Ok(record("only", "sealed"))
                } else {
                    Err(StoreError::InvalidRow("already populated".to_string()))
                }
            })
        };

        let outcomes: Vec<_> = std::thread::scope(|s| {
            let a = s.spawn(|| insert_if_empty(&first));
            let b = s.spawn(|| insert_if_empty(&second));
            vec![a.join().unwrap(), b.join().unwrap()]
        });

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            SqliteCardStore::new(&first).count().unwrap(),
            1,
            "Only one connection may insert into an empty table"
        );
    }
}
