//! Test support utilities for passbed integration tests.
//!
//! Provides an isolated test environment: every test gets its own temp
//! home, its own GNUPGHOME, and its own PASSWORD_STORE_DIR, so nothing
//! ever touches the developer's real keyring or store.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// No process-global state is mutated; child processes receive their
/// environment explicitly, so tests can safely run in parallel.
pub struct Test {
    /// Temporary working directory for the test
    pub dir: TempDir,
    /// Temporary home directory (keyring and store live under it)
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment with an isolated keyring dir.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        let gnupg = home.path().join(".gnupg");
        std::fs::create_dir_all(&gnupg).expect("failed to create GNUPGHOME");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // gpg refuses keyrings with group/other access.
            std::fs::set_permissions(&gnupg, std::fs::Permissions::from_mode(0o700))
                .expect("failed to chmod GNUPGHOME");
        }

        Self { dir, home }
    }

    /// The isolated keyring directory.
    pub fn gnupg_home(&self) -> PathBuf {
        self.home.path().join(".gnupg")
    }

    /// The isolated password-store directory.
    pub fn store_dir(&self) -> PathBuf {
        self.home.path().join("password-store")
    }

    /// Write an os-release file into the test dir and return its path.
    pub fn write_release(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("os-release");
        std::fs::write(&path, contents).expect("failed to write release file");
        path
    }
}
