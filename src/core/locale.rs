//! Locale activation.
//!
//! Debian family: uncomment (or append) the allow-list in
//! /etc/locale.gen and run `locale-gen`. RHEL family: install the
//! matching `glibc-langpack-*` packages. Either way the result is
//! queryable through `locale -a`, which doubles as the precondition
//! probe.

use std::path::Path;

use tracing::info;

use crate::core::distro::DistroFamily;
use crate::core::pkg::PackageManager;
use crate::core::runner::Cmd;
use crate::error::Result;

/// Debian's locale definition allow-list.
pub const LOCALE_GEN_FILE: &str = "/etc/locale.gen";

/// Enable the given locales for the detected family.
pub fn enable(family: DistroFamily, locales: &[String]) -> Result<()> {
    match family {
        DistroFamily::Debian => enable_debian(Path::new(LOCALE_GEN_FILE), locales),
        DistroFamily::Rhel => enable_rhel(locales),
    }
}

fn enable_debian(locale_gen: &Path, locales: &[String]) -> Result<()> {
    let existing = if locale_gen.exists() {
        std::fs::read_to_string(locale_gen)?
    } else {
        String::new()
    };
    let updated = activate_locale_gen_lines(&existing, locales);
    if updated != existing {
        std::fs::write(locale_gen, updated)?;
    }
    info!(count = locales.len(), "generating locale definitions");
    Cmd::new("locale-gen").run("generate locales")?;
    Ok(())
}

fn enable_rhel(locales: &[String]) -> Result<()> {
    let packages: Vec<String> = locales.iter().map(|l| langpack_for(l)).collect();
    let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
    info!(?packages, "installing locale language packs");
    PackageManager::Yum.install(&refs)
}

/// True when `locale -a` already lists the locale.
pub fn is_present(locale: &str) -> Result<bool> {
    let out = Cmd::new("locale").arg("-a").capture("probe locales")?;
    if !out.success() {
        return Ok(false);
    }
    let wanted = normalize(locale);
    Ok(out.stdout.lines().any(|l| normalize(l.trim()) == wanted))
}

/// Rewrite locale.gen content so every requested locale is active.
/// Uncomments a matching commented line when one exists, appends when
/// the locale is absent entirely.
fn activate_locale_gen_lines(existing: &str, locales: &[String]) -> String {
    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
    for locale in locales {
        let entry = format!("{locale} UTF-8");
        if lines.iter().any(|l| l.trim() == entry) {
            continue;
        }
        let mut uncommented = false;
        for line in &mut lines {
            let stripped = line.trim_start_matches(['#', ' ']).trim();
            if stripped == entry {
                *line = entry.clone();
                uncommented = true;
                break;
            }
        }
        if !uncommented {
            lines.push(entry);
        }
    }
    let mut result = lines.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

/// glibc-langpack package carrying a locale's definitions.
fn langpack_for(locale: &str) -> String {
    let lang = locale.split(['_', '.']).next().unwrap_or(locale);
    format!("glibc-langpack-{lang}")
}

/// Fold the encoding-name spelling differences (`UTF-8` vs `utf8`) that
/// separate locale requests from `locale -a` output.
fn normalize(locale: &str) -> String {
    locale.to_lowercase().replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_uncomment_existing_entry() {
        let existing = "# es_ES.UTF-8 UTF-8\n# ja_JP.UTF-8 UTF-8\nen_US.UTF-8 UTF-8\n";
        let updated = activate_locale_gen_lines(existing, &locales(&["es_ES.UTF-8"]));
        assert!(
            updated.starts_with("es_ES.UTF-8 UTF-8\n"),
            "commented entry should be activated in place, got: {updated}"
        );
        assert!(updated.contains("# ja_JP.UTF-8 UTF-8"), "untouched lines stay commented");
    }

    #[test]
    fn test_append_missing_entry() {
        let updated = activate_locale_gen_lines("", &locales(&["ja_JP.UTF-8"]));
        assert_eq!(updated, "ja_JP.UTF-8 UTF-8\n");
    }

    #[test]
    fn test_already_active_is_untouched() {
        let existing = "en_US.UTF-8 UTF-8\n";
        let updated = activate_locale_gen_lines(existing, &locales(&["en_US.UTF-8"]));
        assert_eq!(updated, existing);
    }

    #[test]
    fn test_langpack_names() {
        assert_eq!(langpack_for("en_US.UTF-8"), "glibc-langpack-en");
        assert_eq!(langpack_for("es_ES.UTF-8"), "glibc-langpack-es");
        assert_eq!(langpack_for("ja_JP.UTF-8"), "glibc-langpack-ja");
    }

    #[test]
    fn test_normalize_matches_locale_a_spelling() {
        assert_eq!(normalize("en_US.UTF-8"), normalize("en_US.utf8"));
        assert_ne!(normalize("en_US.UTF-8"), normalize("es_ES.utf8"));
    }
}
