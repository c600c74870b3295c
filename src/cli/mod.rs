//! Command-line interface.

pub mod completions;
pub mod output;
pub mod provision;
pub mod seed;
pub mod verify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Profile;
use crate::core::distro::DEFAULT_RELEASE_FILE;
use crate::error::Result;

/// Passbed - disposable pass/GnuPG test environments.
#[derive(Parser)]
#[command(
    name = "passbed",
    about = "Provisions disposable pass/GnuPG test environments and seeds fixture stores",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Profile file overriding the fixture defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Install pass, GnuPG, Python, and locale data for this container
    Provision {
        /// Release-identifier file used for distribution detection
        #[arg(long, value_name = "PATH", default_value = DEFAULT_RELEASE_FILE)]
        release_file: PathBuf,

        /// Print the step plan without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Seed the fixture store: one decryptable entry, one orphaned one
    Seed {
        /// Print the step plan without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that the seeded fixture still honors its invariants
    Verify,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command, config: Option<PathBuf>) -> Result<()> {
    let profile = Profile::load(config.as_deref())?;

    match command {
        Command::Provision {
            release_file,
            dry_run,
        } => provision::execute(&release_file, &profile, dry_run),
        Command::Seed { dry_run } => seed::execute(&profile, dry_run),
        Command::Verify => verify::execute(&profile),
        Command::Completions { shell } => completions::execute(shell),
    }
}
