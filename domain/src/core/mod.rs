//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] — domain-level validation errors
//! - [`error_kind::ErrorKind`] — the failure taxonomy reported to callers

pub mod error;
pub mod error_kind;
