//! Plan - the full task list for one run

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use super::filter::{FilterDecision, should_update};
use crate::config::UpallConfig;
use crate::domain::Task;
use crate::error::UpallError;

/// Build the task list: plugin pulls (sorted by name), then the cached
/// commands, then the optional extra command.
///
/// Directories the filter rejects never become tasks.
pub fn plan_tasks(config: &UpallConfig) -> Result<Vec<Task>, UpallError> {
    let mut tasks = Vec::new();

    if config.include_plugins {
        for dir in plugin_entries(&config.plugin_dir)? {
            match should_update(&dir, &config.exclusions) {
                FilterDecision::Runnable => tasks.push(Task::repository_update(dir)),
                skipped => trace!(dir = %dir.display(), decision = ?skipped, "skipping"),
            }
        }
    }

    tasks.extend(config.commands.iter().cloned().map(Task::command));

    if let Some(argv) = &config.extra_command {
        tasks.push(Task::invocation(argv.iter().cloned()));
    }

    Ok(tasks)
}

/// Entries of `plugin_dir`, sorted. A missing directory yields nothing.
fn plugin_entries(plugin_dir: &Path) -> Result<Vec<PathBuf>, UpallError> {
    let read_err = |source| UpallError::ReadPluginDir {
        path: plugin_dir.to_path_buf(),
        source,
    };

    let entries = match std::fs::read_dir(plugin_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(dir = %plugin_dir.display(), "plugin directory not found, skipping plugin updates");
            return Ok(Vec::new());
        }
        Err(e) => return Err(read_err(e)),
    };

    let mut dirs = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    dirs.sort();
    Ok(dirs)
}
