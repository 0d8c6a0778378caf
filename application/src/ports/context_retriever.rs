//! Context Retriever port
//!
//! Knowledge base lookup used to enrich a prompt before inference.

use async_trait::async_trait;
use relay_domain::{ContextQuery, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Knowledge base not found: {0}")]
    NotFound(String),

    #[error("Retrieval failed: {0}")]
    RequestFailed(String),
}

impl RetrievalError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ContextUnavailable
    }
}

#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Return a block of text to splice into the prompt.
    async fn retrieve(&self, query: &ContextQuery) -> Result<String, RetrievalError>;
}
