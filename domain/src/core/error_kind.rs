//! Failure taxonomy shared by every layer.
//!
//! Each layer keeps its own `thiserror` enum; [`ErrorKind`] is the stable
//! name that survives all the way into a response body.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of failure, preserved in structured error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The trigger payload was malformed or missing required fields.
    InvalidRequest,
    /// A destination was incomplete (connection id without address, or vice versa).
    InvalidDestination,
    /// The knowledge base lookup failed.
    ContextUnavailable,
    /// The referenced document could not be fetched.
    DocumentUnavailable,
    /// The inference call failed before or during streaming.
    InferenceFailure,
    /// A push to a listener failed. Never aborts a run.
    RelayFailure,
    /// Connection registry or prompt store I/O failed.
    StoreFailure,
    /// Handing work to the async worker failed.
    SubmissionFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::InvalidDestination => "InvalidDestination",
            ErrorKind::ContextUnavailable => "ContextUnavailable",
            ErrorKind::DocumentUnavailable => "DocumentUnavailable",
            ErrorKind::InferenceFailure => "InferenceFailure",
            ErrorKind::RelayFailure => "RelayFailure",
            ErrorKind::StoreFailure => "StoreFailure",
            ErrorKind::SubmissionFailure => "SubmissionFailure",
        }
    }

    /// Whether the failure is the caller's fault (maps to a 4xx status).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ErrorKind::InvalidRequest | ErrorKind::InvalidDestination)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
