// # samba-tool Command Executor
//
// Runs `samba-tool` as a child process for the SambaDNS record core.
//
// ## Behavior
//
// - One process per call; nothing is pooled, cached or reused
// - Authentication (`-U user%password`) is appended after the caller's arguments
// - Non-zero exit is returned as `Error::Tool` with the captured stderr, uninterpreted
// - Optional per-invocation deadline; on expiry the child is killed
//
// ## Security Requirements
//
// - The password NEVER appears in logs or Debug output
// - Logged argument vectors never include the authentication pair

use async_trait::async_trait;
use sambadns_core::config::{Credentials, SambaDnsConfig};
use sambadns_core::{CommandExecutor, Error, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Executes `samba-tool` (or a stand-in at another path)
///
/// # Deadline
///
/// Without [`SambaToolExecutor::with_timeout`] a call waits for the child
/// for as long as it runs.
pub struct SambaToolExecutor {
    /// Program to execute
    program: String,

    /// Authentication for every invocation
    /// ⚠️ NEVER log the password
    credentials: Credentials,

    /// Per-invocation deadline
    timeout: Option<Duration>,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for SambaToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SambaToolExecutor")
            .field("program", &self.program)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SambaToolExecutor {
    /// Create an executor with no deadline
    ///
    /// # Parameters
    ///
    /// - `program`: path or name of the program (usually `samba-tool`)
    /// - `credentials`: appended as `-U user%password` to every invocation
    pub fn new(program: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            program: program.into(),
            credentials,
            timeout: None,
        }
    }

    /// Kill the child and fail with [`Error::Timeout`] once `timeout` elapses
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build an executor from a validated configuration
    pub fn from_config(config: &SambaDnsConfig) -> Result<Self> {
        config.validate()?;

        let executor = Self::new(&config.tool_path, config.credentials()?);
        Ok(match config.timeout() {
            Some(timeout) => executor.with_timeout(timeout),
            None => executor,
        })
    }

    /// The configured deadline, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl CommandExecutor for SambaToolExecutor {
    async fn run(&self, args: Vec<String>) -> Result<String> {
        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .args(self.credentials.auth_args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Dropping the output future on timeout drops the child, which kills it
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    tracing::warn!("{} timed out after {:?}", self.program, limit);
                    Error::Timeout {
                        program: self.program.clone(),
                        after: limit,
                    }
                })?,
            None => command.output().await,
        }
        .map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::debug!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
            return Err(Error::tool(output.status.to_string(), stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn program(&self) -> &str {
        &self.program
    }
}
