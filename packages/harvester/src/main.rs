//! CLI entry point for the harvester.

use ruslaw_harvester::cli;
use tracing_subscriber::EnvFilter;

/// Exit status when the catalog itself is unusable.
const EXIT_CATALOG_INVALID: i32 = 2;

fn main() {
    // Initialize tracing with WARN level by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        let code = if e.is_catalog_validation() {
            EXIT_CATALOG_INVALID
        } else {
            1
        };
        std::process::exit(code);
    }
}
