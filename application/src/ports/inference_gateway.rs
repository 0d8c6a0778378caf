//! Inference Gateway port
//!
//! Defines the interface for streaming text out of a managed model.

use async_trait::async_trait;
use relay_domain::{ErrorKind, StreamFragment};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during inference
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Throttled: {0}")]
    Throttled(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InferenceFailure
    }
}

/// One inference call: the final prompt plus an optional PDF.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub prompt: String,
    pub document: Option<Vec<u8>>,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            document: None,
        }
    }

    pub fn with_document(mut self, document: Option<Vec<u8>>) -> Self {
        self.document = document;
        self
    }
}

/// Item carried by a [`StreamHandle`].
pub type FragmentResult = Result<StreamFragment, GatewayError>;

/// Handle for receiving fragments from an inference call.
///
/// Wraps an `mpsc::Receiver` fed by the adapter in generation order. The
/// stream is finite and cannot be restarted; it ends at a final fragment,
/// at the first error, or when the sender is dropped.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<FragmentResult>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<FragmentResult>) -> Self {
        Self { receiver }
    }

    /// Create a bounded channel and the handle reading from it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<FragmentResult>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }

    /// Next fragment in generation order.
    pub async fn next(&mut self) -> Option<FragmentResult> {
        self.receiver.recv().await
    }
}

/// Gateway to the managed inference service
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Start a streaming inference call.
    ///
    /// An `Err` here means nothing was generated; errors after the first
    /// fragment arrive through the handle.
    async fn stream(&self, request: InferenceRequest) -> Result<StreamHandle, GatewayError>;
}
