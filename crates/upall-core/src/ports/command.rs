//! CommandExecutor port - spawning external processes
//!
//! The runner never touches `tokio::process` directly. Production wiring uses
//! `SystemCommandExecutor`; tests swap in a scripted executor so they can assert
//! which processes would have been spawned.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::UpallError;

/// A program, its arguments and an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Split an argument list into program + args.
    pub fn from_argv(argv: &[String]) -> Result<Self, UpallError> {
        let (program, args) = argv.split_first().ok_or(UpallError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd: None,
        })
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a process that ran to completion.
///
/// `code` is `None` when the process was terminated by a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub code: Option<i32>,
    /// stdout and stderr interleaved in arrival order.
    pub output: Vec<u8>,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run to completion with stderr merged into stdout.
    ///
    /// Returns `Err` only when the process could not be spawned or its pipes
    /// could not be read; a non-zero exit is reported through `Captured::code`.
    async fn capture(&self, spec: &CommandSpec) -> Result<Captured, UpallError>;

    /// Run to completion attached to the caller's terminal and return the exit
    /// code.
    async fn status(&self, spec: &CommandSpec) -> Result<Option<i32>, UpallError>;
}
