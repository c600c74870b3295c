//! Package installation drivers for the two supported families.
//!
//! Both drivers expose the same tiny surface: cache refresh, install,
//! forced reinstall, and an installed-probe for step preconditions. The
//! `pass` package gets special handling: a rolling-release workaround on
//! Debian sid and a build-from-source fallback when the distribution
//! repository does not carry it at all.

use tracing::{info, warn};

use crate::core::constants;
use crate::core::distro::{Distro, DistroFamily};
use crate::core::runner::{Cmd, CmdOutput};
use crate::error::{PassbedError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Yum,
}

impl PackageManager {
    pub fn for_family(family: DistroFamily) -> Self {
        match family {
            DistroFamily::Debian => Self::Apt,
            DistroFamily::Rhel => Self::Yum,
        }
    }

    fn base(&self) -> Cmd {
        match self {
            // Never let apt drop into a prompt inside a container.
            Self::Apt => Cmd::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive"),
            Self::Yum => Cmd::new("yum"),
        }
    }

    /// Refresh the package metadata cache.
    pub fn refresh(&self) -> Result<()> {
        match self {
            Self::Apt => self.base().arg("update").run("refresh package cache")?,
            Self::Yum => self.base().args(["makecache", "-y"]).run("refresh package cache")?,
        };
        Ok(())
    }

    /// Install packages, failing the step on any resolution error.
    pub fn install(&self, packages: &[&str]) -> Result<()> {
        self.install_cmd(packages, false).run("install packages")?;
        Ok(())
    }

    /// Forced reinstall of a single package. Used for GnuPG, whose locale
    /// message catalogs are stripped from minimized container images and
    /// only come back with a reinstall.
    pub fn reinstall(&self, package: &str) -> Result<()> {
        info!(package, "forced reinstall to restore stripped files");
        match self {
            Self::Apt => self
                .base()
                .args(["install", "--reinstall", "-y", package])
                .run("reinstall package")?,
            Self::Yum => self
                .base()
                .args(["reinstall", "-y", "--setopt=tsflags=", package])
                .run("reinstall package")?,
        };
        Ok(())
    }

    /// Probe whether a package is already installed.
    pub fn is_installed(&self, package: &str) -> Result<bool> {
        let out = match self {
            Self::Apt => Cmd::new("dpkg").args(["-s", package]).capture("probe package")?,
            Self::Yum => Cmd::new("rpm").args(["-q", package]).capture("probe package")?,
        };
        Ok(out.success())
    }

    fn install_cmd(&self, packages: &[&str], skip_recommends: bool) -> Cmd {
        let mut cmd = self.base().args(["install", "-y"]);
        if *self == Self::Apt && skip_recommends {
            cmd = cmd.arg("--no-install-recommends");
        }
        cmd.args(packages.iter().copied())
    }
}

/// Install `pass`, working around the known packaging defects.
///
/// On Debian sid the package's recommends chain is periodically
/// uninstallable mid-transition; a retry without recommends installs the
/// core tool. When the repository has no `pass` package at all (stock
/// RHEL without EPEL), fall back to building from upstream source.
pub fn install_pass(pm: PackageManager, distro: &Distro) -> Result<()> {
    let first = pm.install_cmd(&["pass"], false).capture("install pass")?;
    if first.success() {
        return Ok(());
    }

    if distro.is_rolling_debian() && unresolvable_dependencies(&first) {
        warn!("pass recommends are uninstallable on sid, retrying without recommends");
        pm.install_cmd(&["pass"], true).run("install pass (no recommends)")?;
        return Ok(());
    }

    if package_unavailable(pm, &first) {
        warn!("no pass package in the distribution repository, building from source");
        return build_pass_from_source();
    }

    Err(PassbedError::StepFailed {
        step: "install pass".into(),
        program: first_program(pm).into(),
        code: first.code,
        stderr: first.stderr,
    })
}

fn first_program(pm: PackageManager) -> &'static str {
    match pm {
        PackageManager::Apt => "apt-get",
        PackageManager::Yum => "yum",
    }
}

fn unresolvable_dependencies(out: &CmdOutput) -> bool {
    let text = format!("{}\n{}", out.stdout, out.stderr);
    text.contains("unmet dependencies") || text.contains("not going to be installed")
}

fn package_unavailable(pm: PackageManager, out: &CmdOutput) -> bool {
    let text = format!("{}\n{}", out.stdout, out.stderr);
    match pm {
        PackageManager::Apt => text.contains("Unable to locate package"),
        PackageManager::Yum => {
            text.contains("No package pass available")
                || text.contains("Unable to find a match")
                || text.contains("Nothing to do")
        }
    }
}

/// Clone upstream password-store and run its standard install target.
/// Any failure here is fatal; there is no further fallback.
pub fn build_pass_from_source() -> Result<()> {
    let checkout = tempfile::tempdir()?;
    let src = checkout.path().join("password-store");

    Cmd::new("git")
        .args(["clone", "--depth=1", constants::PASS_GIT_URL])
        .arg(src.display().to_string())
        .run("clone password-store")?;

    Cmd::new("make")
        .arg("-C")
        .arg(src.display().to_string())
        .args(["install", "PREFIX=/usr"])
        .run("make install password-store")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(code: i32, stdout: &str, stderr: &str) -> CmdOutput {
        CmdOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn test_apt_unavailable_detection() {
        let o = out(100, "", "E: Unable to locate package pass\n");
        assert!(package_unavailable(PackageManager::Apt, &o));
        let o = out(100, "", "E: Broken packages\n");
        assert!(!package_unavailable(PackageManager::Apt, &o));
    }

    #[test]
    fn test_yum_unavailable_detection() {
        let o = out(1, "No package pass available.\n", "Error: Nothing to do\n");
        assert!(package_unavailable(PackageManager::Yum, &o));
    }

    #[test]
    fn test_sid_dependency_breakage_detection() {
        let o = out(
            100,
            "Some packages could not be installed.\n",
            "The following packages have unmet dependencies:\n pass : Recommends: qrencode but it is not going to be installed\n",
        );
        assert!(unresolvable_dependencies(&o));
        assert!(!unresolvable_dependencies(&out(0, "", "")));
    }

    #[test]
    fn test_install_cmd_rendering() {
        let apt = PackageManager::Apt;
        assert_eq!(
            apt.install_cmd(&["pass", "gnupg2"], false).render(),
            "apt-get install -y pass gnupg2"
        );
        assert_eq!(
            apt.install_cmd(&["pass"], true).render(),
            "apt-get install -y --no-install-recommends pass"
        );
        let yum = PackageManager::Yum;
        assert_eq!(
            yum.install_cmd(&["pass"], false).render(),
            "yum install -y pass"
        );
    }

    #[test]
    fn test_family_mapping() {
        assert_eq!(
            PackageManager::for_family(DistroFamily::Debian),
            PackageManager::Apt
        );
        assert_eq!(
            PackageManager::for_family(DistroFamily::Rhel),
            PackageManager::Yum
        );
    }
}
