use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassbedError {
    #[error("unsupported distribution (expected a Debian- or RHEL-family os-release)")]
    UnsupportedDistro {
        /// Raw contents of the release file, dumped to stderr for diagnosis.
        release: String,
    },

    #[error("release file not readable: {path}: {source}")]
    ReleaseFileUnreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("step `{step}` failed: {program} exited with {code}\n{stderr}")]
    StepFailed {
        step: String,
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("step `{step}` failed: could not spawn {program}: {source}")]
    SpawnFailed {
        step: String,
        program: String,
        source: std::io::Error,
    },

    #[error("required tool not found: {0}")]
    ToolMissing(String),

    #[error("store already seeded: {0} (remove it or point PASSWORD_STORE_DIR elsewhere)")]
    AlreadySeeded(String),

    #[error("fixture invariant violated: {0}")]
    InvariantViolated(String),

    #[error("no home directory available to locate the password store")]
    NoHomeDir,

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PassbedError>;

impl PassbedError {
    /// Process exit code for this error. Unsupported distributions exit
    /// with 2; everything else propagates as a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PassbedError::UnsupportedDistro { .. } => 2,
            _ => 1,
        }
    }
}
