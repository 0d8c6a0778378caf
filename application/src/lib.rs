//! Application layer for bedrock-relay
//!
//! This crate contains the stream coordinator, the message relay and the
//! port definitions adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    connection_registry::ConnectionRegistry,
    context_retriever::{ContextRetriever, RetrievalError},
    document_store::DocumentStore,
    inference_gateway::{GatewayError, InferenceGateway, InferenceRequest, StreamHandle},
    prompt_store::PromptStore,
    push_transport::{PushTransport, TransportError},
    store_error::StoreError,
    task_submitter::{TaskError, TaskSubmitter},
};
pub use use_cases::message_relay::{MessageRelay, RelayError};
pub use use_cases::stream_coordinator::{StreamCoordinator, StreamCoordinatorError};
