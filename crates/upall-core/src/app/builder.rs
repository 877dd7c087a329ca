//! PipelineBuilder - 実行計画の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターン（executor / cache は差し替え可能、既定は本番実装）
//! - spawn 前の検証：同じキャッシュファイルに書く task は後勝ちにせず、後から来た方を落とす
//! - 計画エラー（plugin ディレクトリが読めない等）だけが build を失敗させる

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use super::pipeline::Pipeline;
use super::plan::plan_tasks;
use crate::config::UpallConfig;
use crate::domain::{Route, Task};
use crate::error::UpallError;
use crate::impls::{FsOutputCache, SystemCommandExecutor};
use crate::ports::{CommandExecutor, OutputCache};

/// PipelineBuilder は設定から Pipeline を組み立てる
///
/// # 使用例
/// ```ignore
/// let pipeline = PipelineBuilder::new(UpallConfig::load()?).build()?;
/// let report = pipeline.run().await?;
/// ```
pub struct PipelineBuilder {
    config: UpallConfig,
    executor: Option<Arc<dyn CommandExecutor>>,
    cache: Option<Arc<dyn OutputCache>>,
}

/// BuildError は Pipeline 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Plan(#[from] UpallError),
}

impl PipelineBuilder {
    /// 新しい PipelineBuilder を作成
    pub fn new(config: UpallConfig) -> Self {
        Self {
            config,
            executor: None,
            cache: None,
        }
    }

    /// Replace the process executor (defaults to `SystemCommandExecutor`).
    pub fn executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Replace the output cache (defaults to `FsOutputCache` on
    /// `config.cache_dir`).
    pub fn cache(mut self, cache: Arc<dyn OutputCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// task を計画し、route の重複を取り除いて Pipeline を返す
    pub fn build(self) -> Result<Pipeline, BuildError> {
        let tasks = dedupe_routes(plan_tasks(&self.config)?);

        let workers = self.config.worker_count();
        let executor = match self.executor {
            Some(executor) => executor,
            None => Arc::new(SystemCommandExecutor::new()) as Arc<dyn CommandExecutor>,
        };
        let cache = match self.cache {
            Some(cache) => cache,
            None => Arc::new(FsOutputCache::new(&self.config.cache_dir)) as Arc<dyn OutputCache>,
        };

        Ok(Pipeline::new(
            tasks,
            executor,
            cache,
            self.config.post_processors,
            workers,
        ))
    }
}

/// 各 route の所有者は計画順で最初の task
///
/// 重複した後続 task は warn を出して捨てる。route を持たない Invocation は
/// 対象外。
fn dedupe_routes(tasks: Vec<Task>) -> Vec<Task> {
    let mut owners: HashMap<Route, String> = HashMap::new();
    let mut kept = Vec::with_capacity(tasks.len());
    for task in tasks {
        if let Some(route) = task.route() {
            if let Some(first) = owners.get(&route) {
                warn!(
                    route = %route,
                    kept = %first,
                    dropped = %task,
                    "two tasks share a cache record; skipping the later one"
                );
                continue;
            }
            owners.insert(route, task.label());
        }
        kept.push(task);
    }
    kept
}
