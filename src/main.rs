//! scriptbrew - publishes scripts as Homebrew formulae and Debian packages.
//!
//! This binary resolves a script inside the scripts repository, checksums the
//! latest release archive and writes the package manifests.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match scriptbrew::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
