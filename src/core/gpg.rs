//! GnuPG CLI wrapper.
//!
//! Everything runs in batch (unattended) mode: key generation from a
//! rendered parameter script, armor encryption, forced secret-key
//! deletion, and loopback-pinentry decryption. The keyring location is
//! whatever GNUPGHOME the process environment carries, so tests isolate
//! themselves by pointing it at a scratch directory.
//!
//! Decryption failures are classified from gpg's machine-readable status
//! lines (`--status-fd`), the same `[GNUPG:]` protocol the libgpg-error
//! codes come from. The one class the fixture contract cares about is
//! "no secret key" (code 17).

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::core::constants;
use crate::core::runner::Cmd;
use crate::error::{PassbedError, Result};

/// libgpg-error code for a missing secret key.
pub const ERR_NO_SECKEY: u32 = 17;

/// Why a decryption attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptFailure {
    /// No matching secret key in the keyring (the orphan fixture's case).
    NoSecretKey,
    /// Anything else, with the classified code when one was present.
    Other(Option<u32>),
}

/// Keyring location is ambient: gpg reads GNUPGHOME from the process
/// environment, the same environment the `pass` invocations inherit, so
/// both tools always agree on the keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gpg;

impl Gpg {
    pub fn new() -> Self {
        Self
    }

    /// Fail early when the gpg binary is absent.
    pub fn check() -> Result<()> {
        which::which("gpg")
            .map(|_| ())
            .map_err(|_| PassbedError::ToolMissing("gpg".into()))
    }

    fn cmd(&self) -> Cmd {
        Cmd::new("gpg").args(["--batch", "--yes"])
    }

    /// Generate a throwaway key pair and return its fingerprint.
    pub fn generate_key(&self, name: &str, email: &str, passphrase: &str) -> Result<String> {
        let script = batch_script(name, email, passphrase);
        let mut batch = tempfile::NamedTempFile::new()?;
        batch.write_all(script.as_bytes())?;

        info!(email, "generating key pair");
        self.cmd()
            .arg("--gen-key")
            .arg(batch.path().display().to_string())
            .run("generate key")?;

        self.fingerprint_of(email)
    }

    /// Look up the primary-key fingerprint for an identity.
    pub fn fingerprint_of(&self, email: &str) -> Result<String> {
        let out = self
            .cmd()
            .args(["--list-keys", "--with-colons"])
            .arg(email)
            .run("list keys")?;
        parse_fingerprint(&out.stdout).ok_or_else(|| {
            PassbedError::Config(format!("no fingerprint found for {email}"))
        })
    }

    /// True when the keyring holds a secret key for this identity.
    pub fn has_secret_key(&self, email: &str) -> Result<bool> {
        let out = self
            .cmd()
            .args(["--list-secret-keys", "--with-colons"])
            .arg(email)
            .capture("probe secret key")?;
        Ok(out.success() && out.stdout.lines().any(|l| l.starts_with("sec:")))
    }

    /// Armor-encrypt `plaintext` to `recipient` and write it to `out`.
    pub fn encrypt_to_file(&self, recipient: &str, plaintext: &str, out: &Path) -> Result<()> {
        debug!(recipient, out = %out.display(), "encrypting fixture");
        self.cmd()
            .args(["--encrypt", "--armor", "--trust-model", "always"])
            .args(["--recipient", recipient])
            .args(["--output", &out.display().to_string()])
            .stdin_bytes(plaintext.as_bytes().to_vec())
            .run("encrypt fixture")?;
        Ok(())
    }

    /// Irreversibly delete the secret key. Forced, no confirmation; the
    /// ciphertexts bound to it become permanently undecryptable.
    pub fn delete_secret_key(&self, fingerprint: &str) -> Result<()> {
        info!(fingerprint, "destroying secret key");
        self.cmd()
            .arg("--delete-secret-keys")
            .arg(fingerprint)
            .run("delete secret key")?;
        Ok(())
    }

    /// Decrypt a file with a loopback passphrase. On failure the status
    /// lines are classified so callers can tell "no secret key" apart
    /// from everything else.
    pub fn decrypt_file(
        &self,
        path: &Path,
        passphrase: &str,
    ) -> std::result::Result<String, (DecryptFailure, String)> {
        let out = self
            .cmd()
            .args(["--pinentry-mode", "loopback"])
            .args(["--passphrase", passphrase])
            .args(["--status-fd", "2"])
            .arg("--decrypt")
            .arg(path.display().to_string())
            .capture("decrypt");

        match out {
            Ok(out) if out.success() => Ok(out.stdout),
            Ok(out) => Err((classify_failure(&out.stderr), out.stderr)),
            Err(e) => Err((DecryptFailure::Other(None), e.to_string())),
        }
    }
}

/// Render the unattended key-generation parameter script.
///
/// `%no-protection` is deliberately absent: the fixture keys carry a
/// fixed passphrase so downstream pinentry tests have something to type.
fn batch_script(name: &str, email: &str, passphrase: &str) -> String {
    format!(
        "Key-Type: RSA\n\
         Key-Length: {len}\n\
         Subkey-Type: RSA\n\
         Subkey-Length: {len}\n\
         Name-Real: {name}\n\
         Name-Email: {email}\n\
         Expire-Date: 0\n\
         Passphrase: {passphrase}\n\
         %commit\n",
        len = constants::KEY_LENGTH,
    )
}

/// Extract the primary fingerprint from `--with-colons` listing output.
///
/// The first `fpr:` record follows the `pub:` record and carries the
/// fingerprint in field 10.
fn parse_fingerprint(colons: &str) -> Option<String> {
    colons
        .lines()
        .find(|line| line.starts_with("fpr:"))
        .and_then(|line| line.split(':').nth(9))
        .filter(|fpr| !fpr.is_empty())
        .map(str::to_string)
}

/// Classify a failed decryption from `--status-fd` output.
///
/// Two sources of truth, checked in order: an explicit `NO_SECKEY`
/// status token, then a `pkdecrypt_failed` error code (low 16 bits are
/// the libgpg-error code).
fn classify_failure(stderr: &str) -> DecryptFailure {
    let mut code: Option<u32> = None;
    for line in stderr.lines() {
        let Some(rest) = line.strip_prefix("[GNUPG:]") else {
            continue;
        };
        if rest.contains("NO_SECKEY") {
            return DecryptFailure::NoSecretKey;
        }
        if let Some(idx) = rest.find("ERROR pkdecrypt_failed") {
            let tail = rest[idx + "ERROR pkdecrypt_failed".len()..].trim();
            if let Some(num) = tail.split_whitespace().next() {
                if let Ok(n) = num.parse::<u32>() {
                    code = Some(n & 0xFFFF);
                }
            }
        }
    }
    match code {
        Some(ERR_NO_SECKEY) => DecryptFailure::NoSecretKey,
        other => DecryptFailure::Other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_script_layout() {
        let script = batch_script("Tester", "tester@passbed.local", "hunter2");
        assert!(script.contains("Key-Type: RSA"));
        assert!(script.contains("Key-Length: 1024"));
        assert!(script.contains("Name-Real: Tester"));
        assert!(script.contains("Name-Email: tester@passbed.local"));
        assert!(script.contains("Expire-Date: 0"));
        assert!(script.contains("Passphrase: hunter2"));
        assert!(script.ends_with("%commit\n"));
        // Keys must be passphrase protected, never unprotected.
        assert!(!script.contains("%no-protection"));
    }

    #[test]
    fn test_parse_fingerprint() {
        let colons = "tru::1:1700000000:0:3:1:5\n\
                      pub:u:1024:1:AABBCCDDEEFF0011:1700000000:::u:::scESC::::::23::0:\n\
                      fpr:::::::::0123456789ABCDEF0123456789ABCDEF01234567:\n\
                      uid:u::::1700000000::HASH::Tester <tester@passbed.local>::::::::::0:\n";
        assert_eq!(
            parse_fingerprint(colons).as_deref(),
            Some("0123456789ABCDEF0123456789ABCDEF01234567")
        );
    }

    #[test]
    fn test_parse_fingerprint_empty_listing() {
        assert_eq!(parse_fingerprint(""), None);
        assert_eq!(parse_fingerprint("tru::1:1700000000:0:3:1:5\n"), None);
    }

    #[test]
    fn test_classify_no_seckey_status() {
        let stderr = "gpg: encrypted with 1024-bit RSA key\n\
                      [GNUPG:] ENC_TO AABBCCDDEEFF0011 1 0\n\
                      [GNUPG:] NO_SECKEY AABBCCDDEEFF0011\n\
                      gpg: decryption failed: No secret key\n";
        assert_eq!(classify_failure(stderr), DecryptFailure::NoSecretKey);
    }

    #[test]
    fn test_classify_pkdecrypt_code_low_bits() {
        // 67108881 == (4 << 24) | 17: source in the high byte, code 17 low.
        let stderr = "[GNUPG:] ERROR pkdecrypt_failed 67108881\n";
        assert_eq!(classify_failure(stderr), DecryptFailure::NoSecretKey);
    }

    #[test]
    fn test_classify_other_code() {
        let stderr = "[GNUPG:] ERROR pkdecrypt_failed 11\n";
        assert_eq!(classify_failure(stderr), DecryptFailure::Other(Some(11)));
    }

    #[test]
    fn test_classify_ignores_plain_chatter() {
        let stderr = "gpg: decryption failed: Bad session key\n";
        assert_eq!(classify_failure(stderr), DecryptFailure::Other(None));
    }
}
