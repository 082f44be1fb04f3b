use anyhow::Result;
use clap::Parser;
use machine_fingerprint::{FingerprintConfig, Fingerprinter};
use std::env;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Print a stable SHA-256 fingerprint of this machine
#[derive(Parser, Debug)]
#[command(name = "machine-fingerprint")]
#[command(version, about, long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    // Load .env file if it exists (errors ignored)
    let _ = dotenvy::dotenv();

    // Diagnostics go to stderr and only when asked for
    if env::var("MACHINE_FINGERPRINT_DEBUG").is_ok() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    let config = FingerprintConfig::from_env();
    debug!(?config, "loaded configuration");

    let fingerprinter = Fingerprinter::from_config(&config);
    let fingerprint = fingerprinter.generate(None)?;

    println!("{}", fingerprint);
    Ok(())
}
