//! Pipeline - one full maintenance run

use std::sync::Arc;

use tracing::{info, warn};

use super::post_process::run_post_processors;
use super::report::RunReport;
use crate::domain::Task;
use crate::error::UpallError;
use crate::ports::{CommandExecutor, OutputCache};
use crate::runtime::TaskRunner;
use crate::worker::WorkerGroup;

/// A planned, validated run. Built by `PipelineBuilder`.
pub struct Pipeline {
    tasks: Vec<Task>,
    executor: Arc<dyn CommandExecutor>,
    runner: Arc<TaskRunner>,
    post_processors: Vec<String>,
    workers: usize,
}

impl Pipeline {
    pub(crate) fn new(
        tasks: Vec<Task>,
        executor: Arc<dyn CommandExecutor>,
        cache: Arc<dyn OutputCache>,
        post_processors: Vec<String>,
        workers: usize,
    ) -> Self {
        let runner = Arc::new(TaskRunner::new(Arc::clone(&executor), cache));
        Self {
            tasks,
            executor,
            runner,
            post_processors,
            workers,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run every task, wait for all of them, then run the post-processors.
    ///
    /// Task failures are recorded in the report and never abort the run; the
    /// post-processors run regardless. `Err` is returned only when a worker
    /// itself died.
    pub async fn run(self) -> Result<RunReport, UpallError> {
        info!(tasks = self.tasks.len(), workers = self.workers, "starting run");

        let group = WorkerGroup::spawn(self.workers, self.tasks, self.runner);
        let outcomes = group.join().await;

        let post_processors =
            run_post_processors(self.executor.as_ref(), &self.post_processors).await;

        let report = RunReport {
            outcomes: outcomes?,
            post_processors,
        };

        let counts = report.counts();
        if counts.failed > 0 {
            for failure in report.failures() {
                warn!(
                    task = %failure.task,
                    error = failure.error.as_deref().unwrap_or("unknown"),
                    "no cache record written"
                );
            }
        }
        info!(succeeded = counts.succeeded, failed = counts.failed, "run finished");

        Ok(report)
    }
}
