//! External command execution.
//!
//! Every side effect this tool performs goes through an external program
//! (package manager, gpg, pass, locale tooling). Keeping the spawn/capture
//! plumbing in one place keeps the step logic readable and gives dry-run a
//! single point to render argv from.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{PassbedError, Result};

/// A fully described external command, ready to run or render.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: Option<Vec<u8>>,
    cwd: Option<PathBuf>,
}

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CmdOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.envs.push((key.into(), val.into()));
        self
    }

    pub fn stdin_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(bytes.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Shell-ish rendering for logs and `--dry-run` plans.
    pub fn render(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Spawn, feed stdin if any, and capture everything. Nonzero exit is
    /// NOT an error here; probes and workaround branches inspect the code.
    pub fn capture(&self, step: &str) -> Result<CmdOutput> {
        debug!(step, cmd = %self.render(), "running");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command.stdin(if self.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        for (k, v) in &self.envs {
            command.env(k, v);
        }
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| PassbedError::SpawnFailed {
            step: step.to_string(),
            program: self.program.clone(),
            source,
        })?;

        if let Some(bytes) = &self.stdin {
            // Dropping the handle closes the pipe so the child sees EOF.
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(bytes)?;
            }
        }

        let output = child.wait_with_output()?;
        let result = CmdOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            warn!(step, cmd = %self.render(), code = result.code, stderr = %result.stderr.trim(), "command exited nonzero");
        }
        Ok(result)
    }

    /// Run and fail the step on any nonzero exit. This is the fail-fast
    /// path almost every step uses.
    pub fn run(&self, step: &str) -> Result<CmdOutput> {
        let out = self.capture(step)?;
        if out.success() {
            Ok(out)
        } else {
            Err(PassbedError::StepFailed {
                step: step.to_string(),
                program: self.program.clone(),
                code: out.code,
                stderr: out.stderr,
            })
        }
    }
}
