//! Fixture constants shared by the seeder, verifier, and config defaults.
//!
//! Centralizes the literal strings the fixture contract is built on. The
//! two plaintexts are intentionally different and consumers assert on
//! them byte-for-byte, so they must never be unified or reworded.

/// Profile file name (passbed.toml).
pub const CONFIG_FILE: &str = "passbed.toml";

/// Plaintext of the legitimate, decryptable store entry.
pub const RECOVERABLE_PLAINTEXT: &str = "hello world";

/// Plaintext sealed to the deleted key. Nobody can ever read this again.
pub const ORPHANED_PLAINTEXT: &str = "goodbye cruel world";

/// Name of the decryptable store entry.
pub const ENTRY_NAME: &str = "test";

/// Basename (without `.gpg`) of the undecryptable store entry.
pub const ORPHAN_NAME: &str = "unreadable";

/// Staging path for the orphaned ciphertext before it moves into the store.
pub const STAGE_PATH: &str = "/tmp/unreadable.gpg";

/// Identity whose secret key is destroyed after encryption.
pub const ORPHAN_IDENTITY_NAME: &str = "Unrecoverable";
pub const ORPHAN_IDENTITY_EMAIL: &str = "unrecoverable@passbed.local";

/// Identity the store is initialized against.
pub const TESTER_IDENTITY_NAME: &str = "Tester";
pub const TESTER_IDENTITY_EMAIL: &str = "tester@passbed.local";

/// Fixed passphrase protecting both generated keys.
pub const KEY_PASSPHRASE: &str = "hunter2";

/// Key size for the throwaway fixture keys. Deliberately small: these
/// keys protect nothing and small keys generate fast in entropy-starved
/// containers.
pub const KEY_LENGTH: u32 = 1024;

/// Locales the provisioner enables. The non-English ones exercise gpg's
/// translated message catalogs in downstream tests.
pub const LOCALES: &[&str] = &["en_US.UTF-8", "es_ES.UTF-8", "ja_JP.UTF-8"];

/// Default store location relative to HOME when PASSWORD_STORE_DIR is unset.
pub const STORE_DIR_NAME: &str = ".password-store";

/// Upstream source for the build-from-source fallback.
pub const PASS_GIT_URL: &str = "https://git.zx2c4.com/password-store";
