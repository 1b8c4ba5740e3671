// Cardvault — CLI Command Handlers
//
// Each function handles one CLI subcommand. They resolve settings, load the
// PAN key (failing fast on a bad key before the database is touched), and
// call into the vault.

use crate::cipher::{generate_key, KeySource, PanCipher};
use crate::config::{Settings, KEY_VAR};
use crate::error::CardVaultError;
use crate::store::{CardRecord, Database, NewCard, SqliteCardStore};
use crate::vault::{SearchResult, Vault, VaultError};

use super::Commands;

/// Execute the parsed CLI command.
pub fn execute(command: Commands) -> Result<(), CardVaultError> {
    match command {
        Commands::Init => cmd_init(),
        Commands::Keygen => cmd_keygen(),
        Commands::Add { name, pan } => cmd_add(name, pan),
        Commands::Search { last4 } => cmd_search(last4),
        Commands::Count => cmd_count(),
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

fn cmd_init() -> Result<(), CardVaultError> {
    let settings = Settings::from_env();

    // Creates the key in the keyring on first run; validates it either way.
    let _cipher = settings.key_source().cipher()?;

    if let Some(dir) = settings.db_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let _db = Database::open(&settings.db_path)?;

    println!("✓ Cardvault initialized successfully");
    println!("  Database: {}", settings.db_path.display());
    println!("  Key:      {:?}", settings.key_source);
    println!();
    println!("Next: add a card with `cardvault add --name <cardholder> --pan <number>`");

    Ok(())
}

// ─── Keygen ──────────────────────────────────────────────────────────────────

fn cmd_keygen() -> Result<(), CardVaultError> {
    let key = generate_key();
    println!("{}", hex::encode(key.as_slice()));
    eprintln!("Export this value as {} to use it instead of the keyring.", KEY_VAR);
    Ok(())
}

// ─── Add ─────────────────────────────────────────────────────────────────────

fn cmd_add(name: String, pan: String) -> Result<(), CardVaultError> {
    let (db, cipher) = open_vault()?;
    let vault = Vault::new(SqliteCardStore::new(&db), cipher);

    match vault.add(NewCard::new(name, pan)) {
        Ok(record) => {
            print!("{}", render_added(&record));
            Ok(())
        }
        Err(VaultError::DuplicateCard) => {
            println!("Card with that PAN already exists!");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn render_added(record: &CardRecord) -> String {
    format!("✓ Card added successfully!\n  {}\n", record)
}

// ─── Search ──────────────────────────────────────────────────────────────────

fn cmd_search(last4: String) -> Result<(), CardVaultError> {
    let (db, cipher) = open_vault()?;
    let vault = Vault::new(SqliteCardStore::new(&db), cipher);

    let results = vault.find_by_suffix(&last4)?;
    print!("{}", render_results(&last4, &results));

    if vault.integrity_warnings() > 0 {
        eprintln!(
            "Warning: {} stored card(s) could not be decrypted",
            vault.integrity_warnings()
        );
    }

    Ok(())
}

fn render_results(last4: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No cards found ending in {}.\n", last4);
    }

    let mut out = format!("Cards ending in {} ({}):\n", last4, results.len());
    out.push_str(&format!("{:-<80}\n", ""));
    for result in results {
        out.push_str(&format!(
            "  {:24} │ {:16} │ {}\n",
            result.cardholder_name, result.masked_pan, result.created_at
        ));
    }
    out
}

// ─── Count ───────────────────────────────────────────────────────────────────

fn cmd_count() -> Result<(), CardVaultError> {
    let (db, cipher) = open_vault()?;
    let vault = Vault::new(SqliteCardStore::new(&db), cipher);

    println!("{}", vault.record_count()?);
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Load the key and open the database. The key is validated first so a bad
/// key never reaches the store.
fn open_vault() -> Result<(Database, PanCipher), CardVaultError> {
    let settings = Settings::from_env();
    let source = settings.key_source();

    if !source.has_key()? {
        return Err(CardVaultError::Other(format!(
            "No PAN key found. Run `cardvault init` or set {}.",
            KEY_VAR
        )));
    }
    let cipher = source.cipher()?;

    if !settings.db_path.exists() {
        return Err(CardVaultError::Other(format!(
            "Database not found at {}. Run `cardvault init` first.",
            settings.db_path.display()
        )));
    }

    let db = Database::open(&settings.db_path)?;
    Ok((db, cipher))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
