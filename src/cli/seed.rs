//! Seed command - build the fixture password store.
//!
//! Produces exactly two store entries: one decryptable (`test`) and one
//! permanently undecryptable (`unreadable.gpg`, sealed to a key whose
//! secret half is destroyed mid-sequence). The ordering is load-bearing:
//! the orphan key dies strictly after encryption and strictly before the
//! ciphertext moves into the store.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::cli::output;
use crate::config::Profile;
use crate::core::gpg::Gpg;
use crate::core::pass::PassStore;
use crate::core::step::{Plan, Step};
use crate::error::{PassbedError, Result};

pub fn execute(profile: &Profile, dry_run: bool) -> Result<()> {
    let store_dir = profile.store_dir()?;
    let store = PassStore::new(&store_dir);

    let plan = build_plan(profile, store.clone());

    if dry_run {
        plan.preview();
        output::dimmed("dry run, nothing executed");
        return Ok(());
    }

    Gpg::check()?;
    PassStore::check()?;
    refuse_reseed(profile, &store)?;

    plan.execute()?;

    output::success("fixture store seeded");
    output::kv("store", store_dir.display());
    output::kv("entry", format!("{}.gpg (decryptable)", profile.store.entry));
    output::kv("orphan", format!("{}.gpg (no secret key)", profile.store.orphan));
    Ok(())
}

/// Seeding is deliberately not idempotent: a second run would collide
/// with the existing keys and store. Detect the collision up front and
/// fail with a pointer instead of corrupting the fixture.
fn refuse_reseed(profile: &Profile, store: &PassStore) -> Result<()> {
    if store.is_initialized() {
        return Err(PassbedError::AlreadySeeded(
            store.dir().display().to_string(),
        ));
    }
    if store.entry_path(&profile.store.orphan).exists() {
        return Err(PassbedError::AlreadySeeded(
            store.entry_path(&profile.store.orphan).display().to_string(),
        ));
    }
    let gpg = Gpg::new();
    for email in [
        &profile.identities.orphan_email,
        &profile.identities.tester_email,
    ] {
        if gpg.has_secret_key(email)? {
            return Err(PassbedError::AlreadySeeded(format!(
                "keyring already holds {email}"
            )));
        }
    }
    Ok(())
}

fn build_plan(profile: &Profile, store: PassStore) -> Plan {
    let mut plan = Plan::new("Seeding plan");
    let gpg = Gpg::new();

    // The orphan fingerprint flows from generation to deletion.
    let orphan_fpr = Rc::new(RefCell::new(String::new()));

    {
        let fpr = Rc::clone(&orphan_fpr);
        let name = profile.identities.orphan_name.clone();
        let email = profile.identities.orphan_email.clone();
        let passphrase = profile.identities.passphrase.clone();
        plan.push(Step::new("generate orphan key pair", move || {
            *fpr.borrow_mut() = gpg.generate_key(&name, &email, &passphrase)?;
            Ok(())
        }));
    }

    {
        let email = profile.identities.orphan_email.clone();
        let plaintext = profile.fixtures.orphaned.clone();
        let stage = profile.store.stage.clone();
        plan.push(Step::new("encrypt orphan fixture", move || {
            gpg.encrypt_to_file(&email, &plaintext, &stage)
        }));
    }

    {
        let fpr = Rc::clone(&orphan_fpr);
        plan.push(Step::new("destroy orphan secret key", move || {
            let fpr = fpr.borrow();
            info!("orphan ciphertext is now permanently undecryptable");
            gpg.delete_secret_key(&fpr)
        }));
    }

    {
        let name = profile.identities.tester_name.clone();
        let email = profile.identities.tester_email.clone();
        let passphrase = profile.identities.passphrase.clone();
        plan.push(Step::new("generate tester key pair", move || {
            gpg.generate_key(&name, &email, &passphrase)?;
            Ok(())
        }));
    }

    {
        let store = store.clone();
        let email = profile.identities.tester_email.clone();
        plan.push(Step::new("initialize password store", move || {
            store.init(&email)
        }));
    }

    {
        let store = store.clone();
        let entry = profile.store.entry.clone();
        let plaintext = profile.fixtures.recoverable.clone();
        plan.push(Step::new("insert test entry", move || {
            store.insert_multiline(&entry, &plaintext)
        }));
    }

    {
        let stage = profile.store.stage.clone();
        let orphan = profile.store.orphan.clone();
        plan.push(Step::new("adopt orphan into store", move || {
            store.adopt_orphan(&stage, &orphan)?;
            Ok(())
        }));
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_step_ordering() {
        // Destroying the orphan key must sit strictly between encryption
        // and adoption, or the fixture invariant does not hold.
        let profile = Profile::default();
        let plan = build_plan(&profile, PassStore::new("/tmp/nowhere"));
        let outline = plan.outline();

        let pos = |name: &str| {
            outline
                .iter()
                .position(|s| s == name)
                .unwrap_or_else(|| panic!("missing step `{name}` in {outline:?}"))
        };

        assert!(pos("encrypt orphan fixture") < pos("destroy orphan secret key"));
        assert!(pos("destroy orphan secret key") < pos("adopt orphan into store"));
        assert!(pos("generate orphan key pair") < pos("encrypt orphan fixture"));
        assert!(pos("initialize password store") < pos("insert test entry"));
        assert_eq!(outline.len(), 7);
    }
}
