// Cardvault — Application Entry Point
//
// Parses CLI arguments, initializes structured logging (no log line ever
// carries a PAN or key), and dispatches to the command handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardvault::cli::{execute, Cli};

fn main() {
    // RUST_LOG=cardvault=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cardvault=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
