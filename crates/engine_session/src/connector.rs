//! How a session reaches its engine.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tracing::info;

use crate::EngineError;

pub type EngineReader = Box<dyn AsyncBufRead + Send + Unpin>;
pub type EngineWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Line-oriented pipes to an engine, plus the process when there is one.
pub struct EngineIo {
    pub reader: EngineReader,
    pub writer: EngineWriter,
    pub child: Option<Child>,
}

impl EngineIo {
    pub fn new(
        reader: impl AsyncBufRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            child: None,
        }
    }
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<EngineIo, EngineError>;

    /// Human-readable target, used in logs
    fn describe(&self) -> String;
}

/// Spawns an engine binary and talks to it over stdin/stdout.
#[derive(Debug, Clone)]
pub struct ProcessConnector {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessConnector {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[async_trait]
impl Connector for ProcessConnector {
    async fn connect(&self) -> Result<EngineIo, EngineError> {
        info!(program = %self.program.display(), "spawning engine");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Connect("engine stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Connect("engine stdout not captured".into()))?;

        Ok(EngineIo {
            reader: Box::new(BufReader::new(stdout)),
            writer: Box::new(stdin),
            child: Some(child),
        })
    }

    fn describe(&self) -> String {
        self.program.display().to_string()
    }
}
