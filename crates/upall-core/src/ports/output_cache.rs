//! OutputCache port - 取得した出力の保存先
//!
//! route ごとに 1 レコード。同じ route への再書き込みは内容を置き換える（マージも履歴もなし）。

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::Route;
use crate::error::UpallError;

/// OutputCache は成功した task の出力を保存
///
/// # 設計原則
/// - 呼ばれるのはプロセスが 0 で終了した後だけ
/// - route はキャッシュディレクトリ直下の 1 ファイル名。外に出る route はエラー
#[async_trait]
pub trait OutputCache: Send + Sync {
    /// Persist `content` under `route`, returning the written path.
    async fn store(&self, route: &Route, content: &[u8]) -> Result<PathBuf, UpallError>;
}
