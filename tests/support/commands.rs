//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a passbed command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - HOME / GNUPGHOME / PASSWORD_STORE_DIR inside the temp home
    /// - Current directory set to the test directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("passbed").expect("failed to find passbed binary");
        cmd.env("HOME", self.home.path());
        cmd.env("GNUPGHOME", self.gnupg_home());
        cmd.env("PASSWORD_STORE_DIR", self.store_dir());
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `passbed provision --release-file <path>`.
    pub fn provision(&self, release_file: &std::path::Path) -> Output {
        self.cmd()
            .arg("provision")
            .arg("--release-file")
            .arg(release_file)
            .output()
            .expect("failed to run passbed provision")
    }

    /// Shortcut for `passbed provision --dry-run`.
    pub fn provision_dry_run(&self, release_file: &std::path::Path) -> Output {
        self.cmd()
            .arg("provision")
            .arg("--release-file")
            .arg(release_file)
            .arg("--dry-run")
            .output()
            .expect("failed to run passbed provision --dry-run")
    }

    /// Shortcut for `passbed seed`.
    pub fn seed(&self) -> Output {
        self.cmd()
            .arg("seed")
            .output()
            .expect("failed to run passbed seed")
    }

    /// Shortcut for `passbed seed --dry-run`.
    pub fn seed_dry_run(&self) -> Output {
        self.cmd()
            .args(["seed", "--dry-run"])
            .output()
            .expect("failed to run passbed seed --dry-run")
    }

    /// Shortcut for `passbed verify`.
    pub fn verify(&self) -> Output {
        self.cmd()
            .arg("verify")
            .output()
            .expect("failed to run passbed verify")
    }
}
