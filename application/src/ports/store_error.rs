//! Error shared by the storage ports

use relay_domain::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Storage request failed: {0}")]
    RequestFailed(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::StoreFailure
    }
}
