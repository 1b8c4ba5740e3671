// Cardvault — Store Module
//
// Persistence for card records. The vault only needs two things from it:
// insert a record, and enumerate every record. PANs arrive here already
// encrypted; this layer never sees a plaintext account number.

mod db;
mod error;
mod models;
mod repository;

pub use db::Database;
pub use error::StoreError;
pub use models::{CardRecord, NewCard};
pub use repository::{CardStore, SqliteCardStore};
