//! PostProcess - programs that read the cache after the run
//!
//! They get no arguments and no data beyond the populated cache directory.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ports::{CommandExecutor, CommandSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessResult {
    pub program: String,

    /// Exit code, `None` if the program was killed by a signal or never ran.
    pub code: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostProcessResult {
    pub fn success(&self) -> bool {
        self.error.is_none() && self.code == Some(0)
    }
}

/// Run each program in order. A program that fails to start is logged and
/// recorded; the rest still run.
pub async fn run_post_processors(
    executor: &dyn CommandExecutor,
    programs: &[String],
) -> Vec<PostProcessResult> {
    let mut results = Vec::with_capacity(programs.len());

    for program in programs {
        let spec = CommandSpec {
            program: program.clone(),
            args: Vec::new(),
            cwd: None,
        };
        let result = match executor.status(&spec).await {
            Ok(code) => {
                info!(program = %program, code = ?code, "post-processor finished");
                PostProcessResult {
                    program: program.clone(),
                    code,
                    error: None,
                }
            }
            Err(e) => {
                warn!(program = %program, error = %e, "post-processor could not run");
                PostProcessResult {
                    program: program.clone(),
                    code: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::scripted::ScriptedExecutor;

    fn programs() -> Vec<String> {
        vec!["check_outputs_py".to_string(), "parse_brew_upgrade".to_string()]
    }

    #[tokio::test]
    async fn runs_each_program_without_arguments() {
        let exec = ScriptedExecutor::new();
        let results = run_post_processors(&exec, &programs()).await;

        assert_eq!(exec.called(), programs());
        assert!(exec.calls().iter().all(|c| c.args.is_empty()));
        assert!(results.iter().all(PostProcessResult::success));
    }

    #[tokio::test]
    async fn missing_program_does_not_stop_the_next() {
        let exec = ScriptedExecutor::new()
            .fail_spawn("check_outputs_py")
            .respond("parse_brew_upgrade", 2, b"");

        let results = run_post_processors(&exec, &programs()).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].error.is_some());
        assert_eq!(results[1].code, Some(2));
        assert!(!results[1].success());
        assert_eq!(exec.called(), programs());
    }
}
