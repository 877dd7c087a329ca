use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Route, Task};
use crate::error::UpallError;
use crate::ports::{CommandExecutor, CommandSpec, OutputCache};

/// TaskRunner は 1 つの `Task` を実行し、キャッシュ対象なら出力を書き込む
///
/// # 学習ポイント
/// - variant ごとの dispatch（callable + payload の組ではなく enum で表す）
/// - 書き込みは終了コード 0 の後だけなので、失敗した task は中途半端なレコードを残さない
pub struct TaskRunner {
    executor: Arc<dyn CommandExecutor>,
    cache: Arc<dyn OutputCache>,
}

impl TaskRunner {
    pub fn new(executor: Arc<dyn CommandExecutor>, cache: Arc<dyn OutputCache>) -> Self {
        Self { executor, cache }
    }

    /// Execute one task.
    pub async fn run(&self, task: &Task) -> Result<(), UpallError> {
        match task {
            Task::RepositoryUpdate { dir } => {
                let spec = CommandSpec {
                    program: "git".to_string(),
                    args: vec!["pull".to_string()],
                    cwd: None,
                }
                .in_dir(dir);
                self.capture_into(&spec, &Route::for_directory(dir)).await
            }
            Task::CommandExecution { argv } => {
                let spec = CommandSpec::from_argv(argv)?;
                self.capture_into(&spec, &Route::for_argv(argv)).await
            }
            Task::Invocation { argv } => {
                let spec = CommandSpec::from_argv(argv)?;
                match self.executor.status(&spec).await? {
                    Some(0) => Ok(()),
                    code => Err(UpallError::NonZeroExit {
                        command: spec.to_string(),
                        code,
                        output: String::new(),
                    }),
                }
            }
        }
    }

    async fn capture_into(&self, spec: &CommandSpec, route: &Route) -> Result<(), UpallError> {
        let captured = self.executor.capture(spec).await?;
        if !captured.success() {
            return Err(UpallError::NonZeroExit {
                command: spec.to_string(),
                code: captured.code,
                output: String::from_utf8_lossy(&captured.output).into_owned(),
            });
        }

        let path = self.cache.store(route, &captured.output).await?;
        info!(command = %spec, path = %path.display(), "task output cached");
        debug!(route = %route, "task finished");
        Ok(())
    }
}
