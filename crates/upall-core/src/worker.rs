use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{Task, TaskOutcome};
use crate::error::UpallError;
use crate::runtime::TaskRunner;

/// Shared FIFO the workers drain. Tasks are consumed exactly once.
pub type TaskQueue = Arc<Mutex<VecDeque<Task>>>;

/// Worker group handle.
/// - 各ワーカーはキューが空になるまで task を取り出し、空になったら終了する
/// - `join()` で全ワーカーの終了を待ち、全 task の outcome を返す
///
/// task の失敗でワーカーは止まらない。エラーはその task の `TaskOutcome` に畳み込む。
pub struct WorkerGroup {
    joins: Vec<JoinHandle<Vec<TaskOutcome>>>,
}

impl WorkerGroup {
    /// Spawn `n` workers (at least one) over `tasks`.
    pub fn spawn(n: usize, tasks: Vec<Task>, runner: Arc<TaskRunner>) -> Self {
        let n = n.max(1).min(tasks.len().max(1));
        let queue: TaskQueue = Arc::new(Mutex::new(tasks.into()));

        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let q = Arc::clone(&queue);
            let rt = Arc::clone(&runner);
            joins.push(tokio::spawn(worker_loop(worker_id, q, rt)));
        }

        Self { joins }
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Wait for every worker to finish.
    ///
    /// Outcomes are returned in completion order per worker, not submission
    /// order. A worker that panicked is reported as `UpallError::Worker`
    /// after the remaining workers have been awaited.
    pub async fn join(self) -> Result<Vec<TaskOutcome>, UpallError> {
        let mut outcomes = Vec::new();
        let mut first_err = None;

        for (worker, join) in self.joins.into_iter().enumerate() {
            match join.await {
                Ok(mut done) => outcomes.append(&mut done),
                Err(e) => {
                    warn!(worker, error = %e, "worker did not finish");
                    first_err.get_or_insert(UpallError::Worker {
                        worker,
                        message: e.to_string(),
                    });
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(outcomes),
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: TaskQueue,
    runner: Arc<TaskRunner>,
) -> Vec<TaskOutcome> {
    let mut outcomes = Vec::new();

    loop {
        // lock is released before the task runs
        let Some(task) = queue.lock().await.pop_front() else {
            break;
        };

        debug!(worker = worker_id, task = %task, "task started");
        let started_at = Utc::now();
        let result = runner.run(&task).await;
        let outcome = TaskOutcome::from_result(&task, &result, started_at, Utc::now());

        match &result {
            Ok(()) => info!(worker = worker_id, task = %task, "task succeeded"),
            Err(e) => match outcome.output.as_deref() {
                Some(output) => {
                    warn!(worker = worker_id, task = %task, error = %e, output, "task failed")
                }
                None => warn!(worker = worker_id, task = %task, error = %e, "task failed"),
            },
        }
        outcomes.push(outcome);
    }

    debug!(worker = worker_id, completed = outcomes.len(), "worker drained queue");
    outcomes
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::OutcomeKind;
    use crate::impls::FsOutputCache;
    use crate::impls::scripted::ScriptedExecutor;

    fn runner(exec: Arc<ScriptedExecutor>, dir: &std::path::Path) -> Arc<TaskRunner> {
        Arc::new(TaskRunner::new(exec, Arc::new(FsOutputCache::new(dir))))
    }

    #[tokio::test]
    async fn every_task_runs_exactly_once() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = Arc::new(ScriptedExecutor::new());
        let tasks = vec![
            Task::command(["brew", "upgrade"]),
            Task::command(["brew", "cleanup"]),
            Task::command(["brew", "doctor"]),
            Task::invocation(["pydeps"]),
        ];

        let outcomes = WorkerGroup::spawn(3, tasks, runner(exec.clone(), tmp.path()))
            .join()
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 4);
        let mut called = exec.called();
        called.sort();
        assert_eq!(called, vec!["brew cleanup", "brew doctor", "brew upgrade", "pydeps"]);
    }

    #[tokio::test]
    async fn failure_does_not_stop_other_tasks() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = Arc::new(
            ScriptedExecutor::new()
                .respond("brew doctor", 1, b"")
                .respond("brew upgrade", 0, b"ok\n"),
        );
        let tasks = vec![
            Task::command(["brew", "doctor"]),
            Task::command(["brew", "upgrade"]),
        ];

        // a single worker sees the failure first and still runs the next task
        let outcomes = WorkerGroup::spawn(1, tasks, runner(exec, tmp.path()))
            .join()
            .await
            .unwrap();

        let kinds: Vec<_> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OutcomeKind::Failure, OutcomeKind::Success]);
        assert!(tmp.path().join("brew_upgrade.txt").exists());
        assert!(!tmp.path().join("brew_doctor.txt").exists());
    }

    #[tokio::test]
    async fn failed_outcome_carries_command_output() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = Arc::new(ScriptedExecutor::new().respond(
            "brew doctor",
            1,
            b"Warning: Unbrewed header files were found\n",
        ));

        let tasks = vec![Task::command(["brew", "doctor"])];
        let outcomes = WorkerGroup::spawn(1, tasks, runner(exec, tmp.path()))
            .join()
            .await
            .unwrap();

        assert_eq!(
            outcomes[0].output.as_deref(),
            Some("Warning: Unbrewed header files were found\n")
        );
    }

    #[tokio::test]
    async fn tasks_run_concurrently() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = Arc::new(
            ScriptedExecutor::new()
                .delay("slow one", Duration::from_millis(200))
                .delay("slow two", Duration::from_millis(200)),
        );
        let tasks = vec![Task::command(["slow", "one"]), Task::command(["slow", "two"])];

        let started = std::time::Instant::now();
        WorkerGroup::spawn(2, tasks, runner(exec, tmp.path()))
            .join()
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_millis(390));
    }

    #[tokio::test]
    async fn worker_count_is_clamped() {
        let tmp = tempfile::tempdir().unwrap();
        let r = runner(Arc::new(ScriptedExecutor::new()), tmp.path());

        let group = WorkerGroup::spawn(0, vec![Task::invocation(["a"])], r.clone());
        assert_eq!(group.len(), 1);
        group.join().await.unwrap();

        let group = WorkerGroup::spawn(8, vec![Task::invocation(["a"])], r);
        assert_eq!(group.len(), 1);
        group.join().await.unwrap();
    }

    #[tokio::test]
    async fn empty_task_list_joins_immediately() {
        let tmp = tempfile::tempdir().unwrap();
        let r = runner(Arc::new(ScriptedExecutor::new()), tmp.path());
        let outcomes = WorkerGroup::spawn(4, Vec::new(), r).join().await.unwrap();
        assert!(outcomes.is_empty());
    }
}
