//! Task Submitter port
//!
//! "Run this later" with no return value. Callers do not know whether the
//! work crosses a process boundary.

use async_trait::async_trait;
use relay_domain::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("No worker configured")]
    NotConfigured,

    #[error("Submission failed: {0}")]
    Failed(String),
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SubmissionFailure
    }
}

#[async_trait]
pub trait TaskSubmitter: Send + Sync {
    async fn submit(&self, payload: serde_json::Value) -> Result<(), TaskError>;
}
