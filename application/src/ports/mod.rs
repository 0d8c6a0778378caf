//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod connection_registry;
pub mod context_retriever;
pub mod document_store;
pub mod inference_gateway;
pub mod prompt_store;
pub mod push_transport;
pub mod store_error;
pub mod task_submitter;
