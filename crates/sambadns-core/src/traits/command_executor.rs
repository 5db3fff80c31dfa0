// # Command Executor Trait
//
// The only I/O boundary of the record core: run `samba-tool` once with the
// given arguments and hand back its stdout.
//
// ## Implementations
//
// - samba-tool subprocess: `sambadns-tool` crate
// - In-memory fake: `tests/common/mod.rs`
//
// ## Usage
//
// ```rust,ignore
// use sambadns_core::CommandExecutor;
//
// let listing = executor
//     .run(vec!["dns".into(), "query".into(), "dc1".into(), "example.com".into(), "www".into(), "A".into()])
//     .await?;
// ```

use async_trait::async_trait;

/// Trait for running the external DNS administration tool
///
/// # Contract
///
/// - Append the authentication argument pair (`-U user%password`) after
///   the given arguments.
/// - Spawn exactly one process per call, with no pooling or reuse.
/// - On a zero exit status, return captured stdout.
/// - On a non-zero exit status, return [`crate::Error::Tool`] carrying the
///   exit description and captured stderr, uninterpreted.
///
/// # Forbidden
///
/// - ❌ Retrying (the caller decides what a failure means)
/// - ❌ Interpreting output or failure text
/// - ❌ Spawning background tasks
///
/// A deadline, if any, is a property of the implementation (see
/// `SambaToolExecutor::with_timeout`); there is no default.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the tool once and return its stdout
    ///
    /// # Parameters
    ///
    /// - `args`: subcommand and operands, without authentication
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: captured standard output
    /// - `Err(Error)`: tool failure, spawn failure or timeout
    async fn run(&self, args: Vec<String>) -> Result<String, crate::Error>;

    /// Name of the program being run (for logging)
    fn program(&self) -> &str;
}
