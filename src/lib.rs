//! Passbed - disposable pass/GnuPG test environments.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── provision     # Install pass/GnuPG/locale tooling
//! │   ├── seed          # Build the fixture password store
//! │   ├── verify        # Re-assert the fixture invariants
//! │   └── completions   # Shell completions
//! ├── config            # passbed.toml profile
//! └── core/             # Core library components
//!     ├── distro        # os-release detection (Debian vs RHEL family)
//!     ├── step          # Declarative step plans (precondition, fail-fast)
//!     ├── runner        # External command execution
//!     ├── pkg           # apt/yum drivers, sid workaround, source fallback
//!     ├── locale        # Locale activation and probes
//!     ├── gpg           # Batch keygen, armor encrypt, secret-key delete
//!     └── pass          # Store init/insert, orphan adoption
//! ```
//!
//! # Fixture contract
//!
//! A seeded store contains exactly two entries: `test.gpg`, which
//! decrypts to `hello world` with the Tester key, and `unreadable.gpg`,
//! whose matching secret key was destroyed right after encryption and
//! which therefore fails forever with a no-secret-key error. Seeding is
//! one-shot by design; re-running against the same keyring and store is
//! refused.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
