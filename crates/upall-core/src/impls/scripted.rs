//! ScriptedExecutor - deterministic CommandExecutor for tests
//!
//! Responses are keyed by the command's display form (`"brew upgrade"`).
//! Unknown commands succeed with empty output. Every call is recorded, in
//! order, so tests can assert what would have been spawned and when.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::UpallError;
use crate::ports::{Captured, CommandExecutor, CommandSpec};

#[derive(Debug, Clone)]
pub enum Scripted {
    Exit { code: i32, output: Vec<u8> },
    SpawnFails,
}

#[derive(Default)]
pub struct ScriptedExecutor {
    responses: HashMap<String, Scripted>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<CommandSpec>>,
    finished: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, code: i32, output: &[u8]) -> Self {
        self.responses.insert(
            command.to_string(),
            Scripted::Exit {
                code,
                output: output.to_vec(),
            },
        );
        self
    }

    pub fn fail_spawn(mut self, command: &str) -> Self {
        self.responses
            .insert(command.to_string(), Scripted::SpawnFails);
        self
    }

    pub fn delay(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(command.to_string(), delay);
        self
    }

    /// Every spec passed to `capture` or `status`, in call order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Commands in the order they returned.
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    async fn answer(&self, spec: &CommandSpec) -> Result<Captured, UpallError> {
        let key = spec.to_string();
        self.calls.lock().unwrap().push(spec.clone());

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        let result = match self.responses.get(&key) {
            Some(Scripted::Exit { code, output }) => Ok(Captured {
                code: Some(*code),
                output: output.clone(),
            }),
            Some(Scripted::SpawnFails) => Err(UpallError::Spawn {
                command: key.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
            }),
            None => Ok(Captured {
                code: Some(0),
                output: Vec::new(),
            }),
        };
        self.finished.lock().unwrap().push(key);
        result
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn capture(&self, spec: &CommandSpec) -> Result<Captured, UpallError> {
        self.answer(spec).await
    }

    async fn status(&self, spec: &CommandSpec) -> Result<Option<i32>, UpallError> {
        self.answer(spec).await.map(|c| c.code)
    }
}
