//! Outcome model: what happened to one task.
//!
//! The scheduler never aborts on a failed task, so outcomes are the only
//! place failures surface besides a missing cache file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Route, Task};
use crate::error::UpallError;

/// Upper bound on the failed-command output kept in an outcome.
pub const OUTPUT_TAIL_BYTES: usize = 4096;

/// Serialized as SUCCESS / FAILURE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub kind: OutcomeKind,

    pub task: String,

    /// Cache file name, for tasks whose output is cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Last `OUTPUT_TAIL_BYTES` of a failed command's output. A failed task
    /// leaves no cache record, so this is the only copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TaskOutcome {
    pub fn from_result(
        task: &Task,
        result: &Result<(), UpallError>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let (kind, error, output) = match result {
            Ok(()) => (OutcomeKind::Success, None, None),
            Err(e) => (
                OutcomeKind::Failure,
                Some(e.to_string()),
                e.captured_output().map(|o| tail(o, OUTPUT_TAIL_BYTES).to_string()),
            ),
        };
        Self {
            kind,
            task: task.label(),
            route: task.route(),
            error,
            output,
            started_at,
            finished_at,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// At most `max` trailing bytes of `s`, cut on a char boundary.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
