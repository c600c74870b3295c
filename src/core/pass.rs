//! `pass` (password-store) CLI wrapper.
//!
//! Wraps the handful of operations the seeder needs: store init against a
//! recipient identity, multiline insert, and adopting the orphaned
//! ciphertext into the store root. The store directory is passed
//! explicitly via PASSWORD_STORE_DIR on every invocation so the wrapped
//! tool and this process can never disagree about where the store lives.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::runner::Cmd;
use crate::error::{PassbedError, Result};

#[derive(Debug, Clone)]
pub struct PassStore {
    dir: PathBuf,
}

impl PassStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fail early when the pass binary is absent.
    pub fn check() -> Result<()> {
        which::which("pass")
            .map(|_| ())
            .map_err(|_| PassbedError::ToolMissing("pass".into()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn cmd(&self) -> Cmd {
        Cmd::new("pass").env("PASSWORD_STORE_DIR", self.dir.display().to_string())
    }

    /// True once `pass init` has written the recipient file.
    pub fn is_initialized(&self) -> bool {
        self.dir.join(".gpg-id").exists()
    }

    /// Initialize the store with `gpg_id` as recipient for all entries.
    pub fn init(&self, gpg_id: &str) -> Result<()> {
        info!(store = %self.dir.display(), gpg_id, "initializing password store");
        self.cmd().arg("init").arg(gpg_id).run("pass init")?;
        Ok(())
    }

    /// Insert an entry in multiline mode, overwriting any existing one.
    pub fn insert_multiline(&self, entry: &str, contents: &str) -> Result<()> {
        debug!(entry, "inserting store entry");
        let mut body = contents.to_string();
        if !body.ends_with('\n') {
            body.push('\n');
        }
        self.cmd()
            .args(["insert", "--multiline", "--force"])
            .arg(entry)
            .stdin_bytes(body.into_bytes())
            .run("pass insert")?;
        Ok(())
    }

    /// On-disk path of an entry's ciphertext.
    pub fn entry_path(&self, entry: &str) -> PathBuf {
        self.dir.join(format!("{entry}.gpg"))
    }

    /// Move the staged orphan ciphertext into the store root, where it
    /// looks like a regular entry. Falls back to copy+remove when the
    /// stage lives on another filesystem.
    pub fn adopt_orphan(&self, stage: &Path, orphan: &str) -> Result<PathBuf> {
        let dest = self.entry_path(orphan);
        info!(from = %stage.display(), to = %dest.display(), "adopting orphan entry");
        if std::fs::rename(stage, &dest).is_err() {
            std::fs::copy(stage, &dest)?;
            std::fs::remove_file(stage)?;
        }
        Ok(dest)
    }
}
