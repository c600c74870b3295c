//! Verify command - re-assert the two fixture invariants.
//!
//! A seeded store is only useful to downstream harnesses if exactly one
//! entry decrypts to the known plaintext and exactly one fails with a
//! "no secret key" error. This re-checks both after the fact.

use crate::cli::output;
use crate::config::Profile;
use crate::core::gpg::{DecryptFailure, Gpg};
use crate::core::pass::PassStore;
use crate::error::{PassbedError, Result};

pub fn execute(profile: &Profile) -> Result<()> {
    Gpg::check()?;
    let store = PassStore::new(profile.store_dir()?);
    let gpg = Gpg::new();

    check_recoverable(profile, &store, gpg)?;
    output::success(&format!(
        "{}.gpg decrypts to the expected plaintext",
        profile.store.entry
    ));

    check_orphan(profile, &store, gpg)?;
    output::success(&format!(
        "{}.gpg fails with a no-secret-key error",
        profile.store.orphan
    ));

    output::kv("store", store.dir().display());
    Ok(())
}

fn check_recoverable(profile: &Profile, store: &PassStore, gpg: Gpg) -> Result<()> {
    let path = store.entry_path(&profile.store.entry);
    if !path.exists() {
        return Err(PassbedError::InvariantViolated(format!(
            "missing entry {}",
            path.display()
        )));
    }
    match gpg.decrypt_file(&path, &profile.identities.passphrase) {
        Ok(plaintext) => {
            // pass stores a trailing newline after the inserted body.
            if plaintext.trim_end_matches('\n') == profile.fixtures.recoverable {
                Ok(())
            } else {
                Err(PassbedError::InvariantViolated(format!(
                    "entry `{}` decrypted to unexpected contents",
                    profile.store.entry
                )))
            }
        }
        Err((_, stderr)) => Err(PassbedError::InvariantViolated(format!(
            "entry `{}` failed to decrypt:\n{}",
            profile.store.entry,
            stderr.trim()
        ))),
    }
}

fn check_orphan(profile: &Profile, store: &PassStore, gpg: Gpg) -> Result<()> {
    let path = store.entry_path(&profile.store.orphan);
    if !path.exists() {
        return Err(PassbedError::InvariantViolated(format!(
            "missing orphan {}",
            path.display()
        )));
    }
    match gpg.decrypt_file(&path, &profile.identities.passphrase) {
        Ok(_) => Err(PassbedError::InvariantViolated(format!(
            "orphan `{}` decrypted; its secret key should not exist",
            profile.store.orphan
        ))),
        Err((DecryptFailure::NoSecretKey, _)) => Ok(()),
        Err((DecryptFailure::Other(code), stderr)) => {
            Err(PassbedError::InvariantViolated(format!(
                "orphan `{}` failed with the wrong error class (code {:?}):\n{}",
                profile.store.orphan,
                code,
                stderr.trim()
            )))
        }
    }
}
