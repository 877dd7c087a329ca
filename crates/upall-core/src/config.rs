//! The fixed set of directories and commands a run works on.
//!
//! Everything lives in one value that is handed to the pipeline, so tests can
//! point the plugin and cache directories at temporary paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::UpallError;

pub const PLUGIN_DIR: &str = ".vim/bundle";
pub const CACHE_DIR: &str = ".stdout";
pub const PACKAGE_MANAGER: &str = "brew";

/// Upper bound on the default worker count.
pub const MAX_DEFAULT_WORKERS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpallConfig {
    /// Each entry is a candidate `git pull` target.
    pub plugin_dir: PathBuf,

    /// Where `<route>` files are written.
    pub cache_dir: PathBuf,

    /// Plugin base names that are never pulled (they need their own install
    /// step).
    pub exclusions: BTreeSet<String>,

    /// Whether plugin directories are part of the run at all.
    pub include_plugins: bool,

    /// Commands whose output is cached.
    pub commands: Vec<Vec<String>>,

    /// Extra command run attached to the terminal, never cached.
    pub extra_command: Option<Vec<String>>,

    /// Run in order, with no arguments, once every task has settled.
    pub post_processors: Vec<String>,

    /// Worker pool size. `None` picks `default_workers()`.
    pub workers: Option<usize>,
}

impl UpallConfig {
    /// Defaults relative to `home`.
    pub fn for_home(home: &Path) -> Self {
        let argv = |sub: &str| vec![PACKAGE_MANAGER.to_string(), sub.to_string()];
        Self {
            plugin_dir: home.join(PLUGIN_DIR),
            cache_dir: home.join(CACHE_DIR),
            exclusions: BTreeSet::from(["YouCompleteMe".to_string()]),
            include_plugins: true,
            commands: vec![argv("upgrade"), argv("cleanup"), argv("doctor")],
            extra_command: Some(vec!["pydeps".to_string()]),
            post_processors: vec![
                "check_outputs_py".to_string(),
                "parse_brew_upgrade".to_string(),
            ],
            workers: None,
        }
    }

    /// Defaults relative to the current user's home directory.
    pub fn load() -> Result<Self, UpallError> {
        let home = dirs::home_dir().ok_or(UpallError::HomeDirUnavailable)?;
        Ok(Self::for_home(&home))
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_workers).max(1)
    }
}

/// `min(32, cpus + 4)`: the tasks mostly wait on child processes, so the pool
/// is wider than the core count.
pub fn default_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus + 4).min(MAX_DEFAULT_WORKERS)
}
