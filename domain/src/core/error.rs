//! Domain error types

use super::error_kind::ErrorKind;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Prompt template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    #[error("Invalid prompt record: {0}")]
    InvalidPromptRecord(String),
}

impl DomainError {
    /// The error kind reported to callers for this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidDestination(_) => ErrorKind::InvalidDestination,
            DomainError::EmptyPrompt
            | DomainError::MissingPlaceholder(_)
            | DomainError::InvalidPromptRecord(_) => ErrorKind::InvalidRequest,
        }
    }
}
