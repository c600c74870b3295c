//! Passbed - provisions disposable pass/GnuPG test environments.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passbed::cli::output;
use passbed::cli::{execute, Cli};
use passbed::error::PassbedError;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("PASSBED_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("passbed=debug")
        } else {
            EnvFilter::new("passbed=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command, cli.config) {
        output::error(&e.to_string());

        match &e {
            // The raw release file is the whole diagnosis here; dump it.
            PassbedError::UnsupportedDistro { release } => {
                eprintln!("--- release file ---");
                eprint!("{release}");
                if !release.ends_with('\n') {
                    eprintln!();
                }
                eprintln!("--------------------");
            }
            PassbedError::ToolMissing(_) => {
                output::hint("run: passbed provision");
            }
            PassbedError::AlreadySeeded(_) => {
                output::hint("seeding is one-shot; use a fresh container or store dir");
            }
            _ => {}
        }

        std::process::exit(e.exit_code());
    }
}
