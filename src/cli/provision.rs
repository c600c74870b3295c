//! Provision command - install and configure the pass/GnuPG toolchain.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::config::Profile;
use crate::core::distro::{Distro, DistroFamily};
use crate::core::locale;
use crate::core::pkg::{self, PackageManager};
use crate::core::step::{Plan, Readiness, Step};
use crate::error::Result;

/// Message catalog whose presence tells us GnuPG's locale data survived
/// image minimization. Stripped images lack it until a forced reinstall.
const GNUPG_CATALOG: &str = "/usr/share/locale/es/LC_MESSAGES/gnupg2.mo";

/// Provision the current container: package tooling plus locale data.
///
/// Detection happens before any step runs, so an unsupported
/// distribution terminates with no side effects at all.
pub fn execute(release_file: &Path, profile: &Profile, dry_run: bool) -> Result<()> {
    let distro = Distro::detect(release_file)?;
    let pm = PackageManager::for_family(distro.family);
    info!(id = %distro.id, "provisioning");

    let plan = build_plan(&distro, pm, profile);

    if dry_run {
        plan.preview();
        output::dimmed("dry run, nothing executed");
        return Ok(());
    }

    plan.execute()?;
    output::success(&format!("environment provisioned ({})", distro.id));
    Ok(())
}

fn build_plan(distro: &Distro, pm: PackageManager, profile: &Profile) -> Plan {
    let family_name = match distro.family {
        DistroFamily::Debian => "debian",
        DistroFamily::Rhel => "rhel",
    };
    let mut plan = Plan::new(format!("Provisioning plan ({family_name} family)"));

    plan.push(Step::new("refresh package cache", move || pm.refresh()));

    let base: &'static [&'static str] = match distro.family {
        // `locales` ships locale-gen; RHEL covers locale data via langpacks.
        DistroFamily::Debian => &["gnupg2", "python3", "locales"],
        DistroFamily::Rhel => &["gnupg2", "python3"],
    };
    let base_owned: Vec<&'static str> = base.to_vec();
    let probe_pkgs = base_owned.clone();
    plan.push(
        Step::new("install base packages", move || pm.install(&base_owned)).unless(move || {
            for package in &probe_pkgs {
                if !pm.is_installed(package)? {
                    return Ok(Readiness::Run);
                }
            }
            Ok(Readiness::Skip("all packages installed".into()))
        }),
    );

    let distro_for_pass = distro.clone();
    plan.push(
        Step::new("install pass", move || {
            pkg::install_pass(pm, &distro_for_pass)
        })
        .unless(|| {
            if which::which("pass").is_ok() {
                Ok(Readiness::Skip("pass already on PATH".into()))
            } else {
                Ok(Readiness::Run)
            }
        }),
    );

    let family = distro.family;
    for loc in &profile.locales.enable {
        let loc_run = loc.clone();
        let loc_probe = loc.clone();
        plan.push(
            Step::new(format!("enable locale {loc}"), move || {
                locale::enable(family, &[loc_run])
            })
            .unless(move || {
                if locale::is_present(&loc_probe)? {
                    Ok(Readiness::Skip("already present".into()))
                } else {
                    Ok(Readiness::Run)
                }
            }),
        );
    }

    plan.push(
        Step::new("reinstall gnupg2 locale data", move || pm.reinstall("gnupg2")).unless(|| {
            if Path::new(GNUPG_CATALOG).exists() {
                Ok(Readiness::Skip("message catalogs present".into()))
            } else {
                Ok(Readiness::Run)
            }
        }),
    );

    plan
}
