use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const ROUTE_SUFFIX: &str = ".txt";

/// Characters that would turn a route into more than one path component.
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// File name under the cache directory that holds one task's output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route(String);

impl Route {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// `<base name>.txt`. Falls back to the full path when it has no base name
    /// (e.g. `/` or a path ending in `..`).
    pub fn for_directory(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.to_string_lossy().into_owned());
        Self::flattened(&name)
    }

    /// Tokens joined by `_`, e.g. `["brew", "upgrade"]` -> `brew_upgrade.txt`.
    ///
    /// Path separators inside a token become `_` as well, so
    /// `["/usr/local/bin/brew", "doctor"]` -> `_usr_local_bin_brew_doctor.txt`.
    pub fn for_argv(argv: &[String]) -> Self {
        Self::flattened(&argv.join("_"))
    }

    /// The route always stays a single file name under the cache directory.
    fn flattened(stem: &str) -> Self {
        Self(format!("{}{ROUTE_SUFFIX}", stem.replace(PATH_SEPARATORS, "_")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One unit of scheduled work.
///
/// Each variant carries only what it needs; the runner dispatches on the
/// variant instead of a callable + payload pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Task {
    /// `git pull` inside a plugin checkout; output is cached.
    RepositoryUpdate { dir: PathBuf },

    /// Arbitrary command whose merged output is cached.
    CommandExecution { argv: Vec<String> },

    /// Command run attached to the terminal. Nothing is captured or cached.
    Invocation { argv: Vec<String> },
}

impl Task {
    pub fn repository_update(dir: impl Into<PathBuf>) -> Self {
        Self::RepositoryUpdate { dir: dir.into() }
    }

    pub fn command<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::CommandExecution {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invocation<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Invocation {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Where this task's output lands, if it is cached at all.
    pub fn route(&self) -> Option<Route> {
        match self {
            Task::RepositoryUpdate { dir } => Some(Route::for_directory(dir)),
            Task::CommandExecution { argv } => Some(Route::for_argv(argv)),
            Task::Invocation { .. } => None,
        }
    }

    /// Short human-readable description for logs and reports.
    pub fn label(&self) -> String {
        match self {
            Task::RepositoryUpdate { dir } => format!("git pull ({})", dir.display()),
            Task::CommandExecution { argv } | Task::Invocation { argv } => argv.join(" "),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
