//! SystemCommandExecutor - real processes via `tokio::process`

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use crate::error::UpallError;
use crate::ports::{Captured, CommandExecutor, CommandSpec};

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Default, Clone)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

#[async_trait]
impl CommandExecutor for SystemCommandExecutor {
    async fn capture(&self, spec: &CommandSpec) -> Result<Captured, UpallError> {
        let mut child = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| UpallError::Spawn {
                command: spec.to_string(),
                source,
            })?;

        // Both pipes are set above, so take() always yields Some.
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(UpallError::Capture {
                command: spec.to_string(),
                source: std::io::Error::other("child pipes unavailable"),
            });
        };

        let output = merge_streams(stdout, stderr)
            .await
            .map_err(|source| UpallError::Capture {
                command: spec.to_string(),
                source,
            })?;

        let status = child.wait().await.map_err(|source| UpallError::Capture {
            command: spec.to_string(),
            source,
        })?;

        debug!(command = %spec, code = ?status.code(), bytes = output.len(), "process exited");
        Ok(Captured {
            code: status.code(),
            output,
        })
    }

    async fn status(&self, spec: &CommandSpec) -> Result<Option<i32>, UpallError> {
        let status = Self::command(spec)
            .status()
            .await
            .map_err(|source| UpallError::Spawn {
                command: spec.to_string(),
                source,
            })?;
        Ok(status.code())
    }
}

/// Read two streams to EOF, appending chunks to one buffer in the order they
/// arrive.
async fn merge_streams<A, B>(mut a: A, mut b: B) -> std::io::Result<Vec<u8>>
where
    A: AsyncRead + Unpin,
    B: AsyncRead + Unpin,
{
    let mut combined = Vec::new();
    let mut buf_a = vec![0u8; READ_CHUNK];
    let mut buf_b = vec![0u8; READ_CHUNK];
    let (mut a_open, mut b_open) = (true, true);

    while a_open || b_open {
        tokio::select! {
            n = a.read(&mut buf_a), if a_open => {
                let n = n?;
                if n == 0 {
                    a_open = false;
                } else {
                    combined.extend_from_slice(&buf_a[..n]);
                }
            }
            n = b.read(&mut buf_b), if b_open => {
                let n = n?;
                if n == 0 {
                    b_open = false;
                } else {
                    combined.extend_from_slice(&buf_b[..n]);
                }
            }
        }
    }

    Ok(combined)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            cwd: None,
        }
    }

    #[tokio::test]
    async fn capture_merges_stdout_and_stderr() {
        let captured = SystemCommandExecutor::new()
            .capture(&sh("echo out; echo err 1>&2"))
            .await
            .unwrap();

        assert!(captured.success());
        let text = String::from_utf8(captured.output).unwrap();
        assert!(text.contains("out\n"));
        assert!(text.contains("err\n"));
        assert_eq!(text.len(), "out\nerr\n".len());
    }

    #[tokio::test]
    async fn capture_reports_non_zero_exit() {
        let captured = SystemCommandExecutor::new()
            .capture(&sh("echo broken; exit 3"))
            .await
            .unwrap();

        assert_eq!(captured.code, Some(3));
        assert!(!captured.success());
        assert_eq!(captured.output, b"broken\n");
    }

    #[tokio::test]
    async fn capture_runs_in_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("marker"), "").unwrap();

        let captured = SystemCommandExecutor::new()
            .capture(&sh("ls").in_dir(tmp.path()))
            .await
            .unwrap();

        assert_eq!(captured.output, b"marker\n");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let spec = CommandSpec::from_argv(&["upall-definitely-not-installed".to_string()]).unwrap();
        let err = SystemCommandExecutor::new().capture(&spec).await.unwrap_err();
        assert!(matches!(err, UpallError::Spawn { .. }));

        let err = SystemCommandExecutor::new().status(&spec).await.unwrap_err();
        assert!(matches!(err, UpallError::Spawn { .. }));
    }

    #[tokio::test]
    async fn status_returns_exit_code() {
        let code = SystemCommandExecutor::new().status(&sh("exit 4")).await.unwrap();
        assert_eq!(code, Some(4));
    }
}
