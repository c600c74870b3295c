//! Distribution detection from an os-release file.
//!
//! The provisioner supports exactly two package ecosystems. Everything
//! else is reported as unsupported with the raw release text so a failing
//! CI run shows what it actually ran on.

use std::path::Path;

use tracing::debug;

use crate::error::{PassbedError, Result};

/// Default release-identifier file on all supported targets.
pub const DEFAULT_RELEASE_FILE: &str = "/etc/os-release";

/// Package ecosystem family, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    /// apt-get based: Debian, Ubuntu, and derivatives.
    Debian,
    /// yum/dnf based: Fedora, RHEL, CentOS, Rocky, Alma.
    Rhel,
}

/// Parsed identity of the running distribution.
#[derive(Debug, Clone)]
pub struct Distro {
    pub family: DistroFamily,
    /// os-release ID field (e.g. `debian`, `fedora`).
    pub id: String,
    /// VERSION_CODENAME when present (e.g. `bookworm`, `sid`).
    pub codename: Option<String>,
}

impl Distro {
    /// Read and classify the release file at `path`.
    pub fn detect(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            PassbedError::ReleaseFileUnreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::parse(&raw)
    }

    /// Classify raw os-release text.
    pub fn parse(raw: &str) -> Result<Self> {
        let id = os_release_field(raw, "ID").unwrap_or_default();
        let id_like = os_release_field(raw, "ID_LIKE").unwrap_or_default();
        let codename = os_release_field(raw, "VERSION_CODENAME");

        let family = classify(&id, &id_like).ok_or_else(|| PassbedError::UnsupportedDistro {
            release: raw.to_string(),
        })?;

        debug!(?family, %id, ?codename, "detected distribution");
        Ok(Self {
            family,
            id,
            codename,
        })
    }

    /// True when running the Debian rolling release, which carries the
    /// known-broken `pass` dependency resolution (see `pkg::install_pass`).
    pub fn is_rolling_debian(&self) -> bool {
        self.family == DistroFamily::Debian && self.codename.as_deref() == Some("sid")
    }
}

fn classify(id: &str, id_like: &str) -> Option<DistroFamily> {
    let likes: Vec<&str> = id_like.split_whitespace().collect();
    let matches = |needle: &str| id == needle || likes.contains(&needle);

    if matches("debian") || matches("ubuntu") {
        return Some(DistroFamily::Debian);
    }
    if matches("fedora") || matches("rhel") || matches("centos") {
        return Some(DistroFamily::Rhel);
    }
    None
}

/// Extract a single `KEY=value` field, stripping optional quotes.
fn os_release_field(raw: &str, key: &str) -> Option<String> {
    raw.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() != key {
            return None;
        }
        let v = v.trim().trim_matches('"').trim_matches('\'');
        if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    })
}
