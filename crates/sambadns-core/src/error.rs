//! Error types for the SambaDNS record core
//!
//! This module defines all error types used throughout the crate.
//!
//! Failures coming back from `samba-tool` are plain text. Classification of
//! that text into "absent" / "already exists" / "anything else" lives in
//! [`crate::failure`]; this module only carries the results.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for SambaDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// The verb a failed operation was performing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `dns add`
    Create,
    /// `dns query`
    Query,
    /// `dns delete`
    Delete,
}

impl Verb {
    /// The `samba-tool dns` subcommand for this verb
    pub fn subcommand(self) -> &'static str {
        match self {
            Verb::Create => "add",
            Verb::Query => "query",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Create => "create",
            Verb::Query => "query",
            Verb::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Which half of a two-phase update failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    /// Deleting the old value failed; the server is unchanged
    Delete,
    /// The old value was deleted but creating the new one failed;
    /// the record is now absent on the server
    Create,
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdatePhase::Delete => f.write_str("failed to delete old record"),
            UpdatePhase::Create => f.write_str("failed to create new record"),
        }
    }
}

/// Core error type for the SambaDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// The record or name does not exist where the caller expected one
    #[error("Record not found: {0}")]
    NotFound(String),

    /// `dns add` reported the name/type pair already holds a record
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    /// Create found a stored value that is not equivalent to the requested one
    #[error("record {record} already exists with different value (existing: {existing:?}, requested: {requested:?})")]
    Conflict {
        /// Composite identity of the record (`server/zone/name/TYPE`)
        record: String,
        /// The value the server currently holds
        existing: String,
        /// The value the caller asked for
        requested: String,
    },

    /// The tool's listing did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// `samba-tool` exited with a non-zero status
    #[error("samba-tool error: {message}, stderr: {stderr}")]
    Tool {
        /// The underlying failure (exit status)
        message: String,
        /// Captured standard error
        stderr: String,
    },

    /// The program could not be started at all
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Program that was being executed
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The caller-supplied deadline expired before the program exited
    #[error("{program} did not finish within {after:?}")]
    Timeout {
        /// Program that was being executed
        program: String,
        /// The deadline that expired
        after: Duration,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A propagated failure, annotated with what was being done to which record
    #[error("failed to {verb} record {record}: {source}")]
    Operation {
        /// The verb that failed
        verb: Verb,
        /// Composite identity of the record (`server/zone/name/TYPE`)
        record: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },

    /// One phase of a delete-then-create update failed
    #[error("{phase}: {source}")]
    Update {
        /// The phase that failed
        phase: UpdatePhase,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a tool error from an exit description and captured stderr
    pub fn tool(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Tool {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    /// Wrap an error with the verb and record it was raised for
    pub fn operation(verb: Verb, record: impl Into<String>, source: Error) -> Self {
        Self::Operation {
            verb,
            record: record.into(),
            source: Box::new(source),
        }
    }

    /// Wrap an error with the update phase it was raised in
    pub fn update(phase: UpdatePhase, source: Error) -> Self {
        Self::Update {
            phase,
            source: Box::new(source),
        }
    }

    /// The text failure classification runs against.
    ///
    /// For tool failures this is the exit description followed by the
    /// captured stderr, so markers printed to either place are seen.
    pub fn diagnostic_text(&self) -> String {
        match self {
            Error::Tool { message, stderr } => format!("{message} {stderr}"),
            Error::Operation { source, .. } | Error::Update { source, .. } => {
                source.diagnostic_text()
            }
            other => other.to_string(),
        }
    }

    /// True when an update deleted the old value but failed to create the new one.
    ///
    /// Callers seeing this should retry the create only; the delete already
    /// happened.
    pub fn record_left_absent(&self) -> bool {
        matches!(
            self,
            Error::Update {
                phase: UpdatePhase::Create,
                ..
            }
        )
    }
}
