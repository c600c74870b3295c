//! Profile file (passbed.toml) handling.
//!
//! Every knob defaults to the fixture constants; a profile file only
//! exists to override them for bespoke harnesses. A missing file is
//! normal, a malformed one is fatal.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{PassbedError, Result};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    #[serde(default)]
    pub store: StoreProfile,
    #[serde(default)]
    pub identities: IdentityProfile,
    #[serde(default)]
    pub fixtures: FixtureProfile,
    #[serde(default)]
    pub locales: LocaleProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreProfile {
    /// Store root. When unset, PASSWORD_STORE_DIR then ~/.password-store.
    pub dir: Option<PathBuf>,
    #[serde(default = "default_entry")]
    pub entry: String,
    #[serde(default = "default_orphan")]
    pub orphan: String,
    #[serde(default = "default_stage")]
    pub stage: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityProfile {
    #[serde(default = "default_orphan_name")]
    pub orphan_name: String,
    #[serde(default = "default_orphan_email")]
    pub orphan_email: String,
    #[serde(default = "default_tester_name")]
    pub tester_name: String,
    #[serde(default = "default_tester_email")]
    pub tester_email: String,
    #[serde(default = "default_passphrase")]
    pub passphrase: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureProfile {
    #[serde(default = "default_recoverable")]
    pub recoverable: String,
    #[serde(default = "default_orphaned")]
    pub orphaned: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleProfile {
    #[serde(default = "default_locales")]
    pub enable: Vec<String>,
}

fn default_entry() -> String {
    constants::ENTRY_NAME.to_string()
}
fn default_orphan() -> String {
    constants::ORPHAN_NAME.to_string()
}
fn default_stage() -> PathBuf {
    PathBuf::from(constants::STAGE_PATH)
}
fn default_orphan_name() -> String {
    constants::ORPHAN_IDENTITY_NAME.to_string()
}
fn default_orphan_email() -> String {
    constants::ORPHAN_IDENTITY_EMAIL.to_string()
}
fn default_tester_name() -> String {
    constants::TESTER_IDENTITY_NAME.to_string()
}
fn default_tester_email() -> String {
    constants::TESTER_IDENTITY_EMAIL.to_string()
}
fn default_passphrase() -> String {
    constants::KEY_PASSPHRASE.to_string()
}
fn default_recoverable() -> String {
    constants::RECOVERABLE_PLAINTEXT.to_string()
}
fn default_orphaned() -> String {
    constants::ORPHANED_PLAINTEXT.to_string()
}
fn default_locales() -> Vec<String> {
    constants::LOCALES.iter().map(|s| s.to_string()).collect()
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            dir: None,
            entry: default_entry(),
            orphan: default_orphan(),
            stage: default_stage(),
        }
    }
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self {
            orphan_name: default_orphan_name(),
            orphan_email: default_orphan_email(),
            tester_name: default_tester_name(),
            tester_email: default_tester_email(),
            passphrase: default_passphrase(),
        }
    }
}

impl Default for FixtureProfile {
    fn default() -> Self {
        Self {
            recoverable: default_recoverable(),
            orphaned: default_orphaned(),
        }
    }
}

impl Default for LocaleProfile {
    fn default() -> Self {
        Self {
            enable: default_locales(),
        }
    }
}

impl Profile {
    /// Load from an explicit path, or from ./passbed.toml when present,
    /// or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(constants::CONFIG_FILE);
                if !p.exists() {
                    debug!("no profile file, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        if !path.exists() {
            return Err(PassbedError::Config(format!(
                "profile not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(&path)?;
        let profile: Self = toml::from_str(&contents)?;
        debug!(path = %path.display(), "loaded profile");
        Ok(profile)
    }

    /// Resolve the store root: PASSWORD_STORE_DIR wins, then the profile,
    /// then ~/.password-store (the `pass` default).
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("PASSWORD_STORE_DIR") {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.store.dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|h| h.join(constants::STORE_DIR_NAME))
            .ok_or(PassbedError::NoHomeDir)
    }
}
