// Cardvault — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: init, keygen, add, search, count.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Cardvault — encrypted card storage with masked suffix search.
#[derive(Parser, Debug)]
#[command(name = "cardvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Cardvault: obtain the PAN key and create the database.
    Init,

    /// Print a fresh random key suitable for CARDVAULT_KEY.
    Keygen,

    /// Add a card. Fails if a card with the same PAN is already stored.
    Add {
        /// The cardholder's name.
        #[arg(long)]
        name: String,

        /// The primary account number.
        /// For production use, prefer a wrapper that avoids shell history exposure.
        #[arg(long)]
        pan: String,
    },

    /// Search cards by the last four digits of the PAN.
    Search {
        /// Exactly four digits.
        last4: String,
    },

    /// Print the number of stored cards.
    Count,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "cardvault",
            "add",
            "--name",
            "Alice",
            "--pan",
            "4111111111111234",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { name, pan } => {
                assert_eq!(name, "Alice");
                assert_eq!(pan, "4111111111111234");
            }
            other => panic!("Expected Add, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["cardvault", "search", "1234"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { last4 } if last4 == "1234"));
    }

    #[test]
    fn test_add_requires_pan() {
        assert!(Cli::try_parse_from(["cardvault", "add", "--name", "Alice"]).is_err());
    }
}
