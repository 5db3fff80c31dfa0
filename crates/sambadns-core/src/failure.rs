//! Classification of `samba-tool` failure text
//!
//! `samba-tool` has no machine-readable error channel. Everything the core
//! decides about a failed invocation comes from substring matches against
//! the combined exit description and stderr, using the markers below.

use crate::error::Error;

/// WERROR code for a name with no records at all
pub const NAME_DOES_NOT_EXIST: &str = "WERR_DNS_ERROR_NAME_DOES_NOT_EXIST";

/// WERROR code for a name that exists but lacks the requested record
pub const RECORD_DOES_NOT_EXIST: &str = "WERR_DNS_ERROR_RECORD_DOES_NOT_EXIST";

/// Generic human-readable absence text
pub const DOES_NOT_EXIST: &str = "does not exist";

/// Text printed by `dns add` when the record is already present
pub const ALREADY_EXISTS: &str = "already exist";

const ABSENCE_MARKERS: [&str; 3] = [NAME_DOES_NOT_EXIST, RECORD_DOES_NOT_EXIST, DOES_NOT_EXIST];

/// What a failed invocation means to the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The record or its name is not on the server
    NotFound,
    /// The record is already on the server
    AlreadyExists,
    /// Anything else; propagated unchanged
    Other,
}

impl FailureKind {
    /// Classify raw failure text
    pub fn classify(text: &str) -> Self {
        if ABSENCE_MARKERS.iter().any(|marker| text.contains(marker)) {
            FailureKind::NotFound
        } else if text.contains(ALREADY_EXISTS) {
            FailureKind::AlreadyExists
        } else {
            FailureKind::Other
        }
    }

    /// Classify an executor error.
    ///
    /// Only tool failures carry server text. Spawn failures, timeouts and
    /// configuration problems are always [`FailureKind::Other`].
    pub fn of(err: &Error) -> Self {
        match err {
            Error::Tool { .. } => Self::classify(&err.diagnostic_text()),
            _ => FailureKind::Other,
        }
    }
}
