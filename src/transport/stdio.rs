//! Subprocess transport over stdin/stdout
//!
//! Launches a server as a child process and exchanges newline-delimited
//! JSON-RPC frames over its standard streams. The child runs with a cleared,
//! allow-listed environment and is shut down gracefully on close, with a kill
//! after the grace period and a last-resort kill on drop.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::core::error::{McpError, McpResult};
use crate::transport::env::default_environment;
use crate::transport::traits::{ConnectionState, Transport, TransportEvent};

/// Configuration for launching a server subprocess
#[derive(Debug, Clone)]
pub struct StdioConfig {
    /// Executable to launch
    pub command: String,
    /// Arguments passed to the executable
    pub args: Vec<String>,
    /// Extra environment variables merged over the allow-listed defaults
    pub env: HashMap<String, String>,
    /// Working directory for the child
    pub working_directory: Option<PathBuf>,
    /// How long to wait for a clean exit before killing the child
    pub shutdown_grace: Duration,
}

impl StdioConfig {
    /// Create a config for the given command with default settings
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
            working_directory: None,
            shutdown_grace: Duration::from_secs(5),
        }
    }

    /// Add arguments for the child process
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add an environment variable override for the child
    pub fn with_env<S: Into<String>>(mut self, name: S, value: S) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }
}

/// Transport that talks to a server subprocess over its standard streams
pub struct StdioTransport {
    config: StdioConfig,
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
    events_rx: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    started: AtomicBool,
    closed: AtomicBool,
}

impl StdioTransport {
    /// Create a transport from a config; the child is not launched until `start`
    pub fn new(config: StdioConfig) -> Self {
        Self {
            config,
            child: Mutex::new(None),
            stdin: Mutex::new(None),
            reader_task: Mutex::new(None),
            events_rx: None,
            started: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    fn state(&self) -> ConnectionState {
        if self.closed.load(Ordering::SeqCst) {
            ConnectionState::Closed
        } else if self.started.load(Ordering::SeqCst) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Read loop: one frame per line until EOF or a read error
    async fn read_loop(
        stdout: tokio::process::ChildStdout,
        tx: mpsc::UnboundedSender<TransportEvent>,
    ) {
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    tracing::debug!("server stdout reached EOF");
                    break;
                }
                Ok(_) => {
                    let frame = line.trim();
                    if frame.is_empty() {
                        continue;
                    }
                    tracing::trace!(frame, "received frame");
                    match serde_json::from_str(frame) {
                        Ok(message) => {
                            if tx.send(TransportEvent::Message(message)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "unparseable frame from server");
                            let event = TransportEvent::DecodeError {
                                line: frame.to_string(),
                                error: e.to_string(),
                            };
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "error reading from server stdout");
                    break;
                }
            }
        }

        let _ = tx.send(TransportEvent::Closed);
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn start(&mut self) -> McpResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(McpError::internal("transport already started"));
        }

        tracing::debug!(command = %self.config.command, "launching server subprocess");

        let mut env = default_environment();
        env.extend(self.config.env.clone());

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .env_clear()
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = &self.config.working_directory {
            command.current_dir(dir);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                return Err(McpError::launch(format!(
                    "failed to spawn `{}`: {e}",
                    self.config.command
                )));
            }
        };

        // A child that died before we attach is a launch failure, not a closed pipe
        if let Some(status) = child.try_wait().unwrap_or(None) {
            self.started.store(false, Ordering::SeqCst);
            return Err(McpError::launch(format!(
                "`{}` exited immediately with {status}",
                self.config.command
            )));
        }

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::launch("child stdin was not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::launch("child stdout was not piped"))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(Self::read_loop(stdout, tx));

        *self.child.lock().await = Some(child);
        *self.stdin.lock().await = Some(stdin);
        *self.reader_task.lock().await = Some(reader);
        self.events_rx = Some(rx);

        tracing::debug!("server subprocess launched");
        Ok(())
    }

    async fn send(&self, frame: String) -> McpResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(McpError::transport_closed("transport is closed"));
        }

        let mut guard = self.stdin.lock().await;
        let writer = guard
            .as_mut()
            .ok_or_else(|| McpError::transport_closed("transport not started"))?;

        tracing::trace!(frame = %frame, "sending frame");
        writer.write_all(frame.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    fn events(&mut self) -> Option<mpsc::UnboundedReceiver<TransportEvent>> {
        self.events_rx.take()
    }

    async fn close(&self) -> McpResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        tracing::debug!("closing stdio transport");

        // Closing stdin is the shutdown signal for well-behaved servers
        if let Some(mut writer) = self.stdin.lock().await.take() {
            let _ = writer.shutdown().await;
        }

        if let Some(mut child) = self.child.lock().await.take() {
            match timeout(self.config.shutdown_grace, child.wait()).await {
                Ok(Ok(status)) => {
                    tracing::debug!(%status, "server subprocess exited");
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "error waiting for server subprocess");
                }
                Err(_) => {
                    tracing::warn!("server subprocess outlived grace period, killing it");
                    let _ = child.kill().await;
                }
            }
        }

        if let Some(task) = self.reader_task.lock().await.take() {
            let _ = task.await;
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    fn connection_info(&self) -> String {
        format!("stdio `{}` ({:?})", self.config.command, self.state())
    }
}

impl Drop for StdioTransport {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.child.try_lock() {
            if let Some(child) = guard.as_mut() {
                let _ = child.start_kill();
            }
        }
    }
}
