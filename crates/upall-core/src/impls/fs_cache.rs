//! FsOutputCache - one text file per route under a base directory

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::Route;
use crate::error::UpallError;
use crate::ports::OutputCache;

/// Writes `<base_dir>/<route>`, creating `base_dir` on first use.
///
/// Content is decoded as UTF-8; invalid sequences become U+FFFD rather than
/// failing the task after the command already succeeded.
#[derive(Debug, Clone)]
pub struct FsOutputCache {
    base_dir: PathBuf,
}

impl FsOutputCache {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `base_dir` joined with the route. Fails unless the route is exactly one
    /// normal path component, so nothing is written outside `base_dir`.
    pub fn path_for(&self, route: &Route) -> Result<PathBuf, UpallError> {
        let mut components = Path::new(route.as_str()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_dir.join(route.as_str())),
            _ => Err(UpallError::InvalidRoute {
                route: route.to_string(),
            }),
        }
    }
}

#[async_trait]
impl OutputCache for FsOutputCache {
    async fn store(&self, route: &Route, content: &[u8]) -> Result<PathBuf, UpallError> {
        let path = self.path_for(route)?;
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|source| UpallError::Cache {
                path: self.base_dir.clone(),
                source,
            })?;

        let text = String::from_utf8_lossy(content);
        tokio::fs::write(&path, text.as_bytes())
            .await
            .map_err(|source| UpallError::Cache {
                path: path.clone(),
                source,
            })?;

        debug!(route = %route, bytes = content.len(), "cached output");
        Ok(path)
    }
}
