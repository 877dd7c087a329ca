use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpallError {
    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error("cannot run an empty command")]
    EmptyCommand,

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully. `code` is `None` when it was
    /// killed by a signal.
    #[error("`{command}` exited with {}", exit_label(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("failed to read `{command}` output: {source}")]
    Capture {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write cache file {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The route would resolve outside the cache directory.
    #[error("route `{route}` is not a plain file name")]
    InvalidRoute { route: String },

    #[error("failed to list plugin directory {}: {source}", .path.display())]
    ReadPluginDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {worker} panicked or was cancelled: {message}")]
    Worker { worker: usize, message: String },
}

impl UpallError {
    /// Merged output of a command that ran and failed, if any was produced.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            UpallError::NonZeroExit { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
