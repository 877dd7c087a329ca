//! Filter - which plugin directories are pulled

use std::collections::BTreeSet;
use std::path::Path;

/// Version-control marker that makes a directory a checkout.
pub const REPOSITORY_MARKER: &str = ".git";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Runnable,
    NotARepository,
    Excluded,
}

impl FilterDecision {
    pub fn is_runnable(self) -> bool {
        matches!(self, FilterDecision::Runnable)
    }
}

/// Decide whether `dir` should be pulled.
///
/// Exclusions match the name without its last extension, so `YouCompleteMe`
/// also covers a `YouCompleteMe.vim` checkout. Looks at the filesystem at call
/// time only; nothing is cached.
pub fn should_update(dir: &Path, exclusions: &BTreeSet<String>) -> FilterDecision {
    if !dir.join(REPOSITORY_MARKER).exists() {
        return FilterDecision::NotARepository;
    }
    let excluded = dir
        .file_stem()
        .and_then(|n| n.to_str())
        .is_some_and(|name| exclusions.contains(name));
    if excluded {
        return FilterDecision::Excluded;
    }
    FilterDecision::Runnable
}
