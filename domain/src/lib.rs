//! Domain layer for bedrock-relay
//!
//! This crate contains the value objects and entities of the relay:
//! prompt requests, stream fragments, relay frames and delivery outcomes.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Delivery mode
//!
//! - **Streaming**: a [`Destination`] is present and each fragment is pushed
//!   to the listener as it is generated, followed by one terminal frame
//! - **Buffered**: no destination; fragments are only accumulated and the
//!   caller receives the full text

pub mod connection;
pub mod core;
pub mod prompt;
pub mod providers;
pub mod relay;
pub mod session;

// Re-export commonly used types
pub use connection::Connection;
pub use core::{error::DomainError, error_kind::ErrorKind};
pub use prompt::{ContextQuery, PromptBuilder, PromptRequest, PromptTemplate};
pub use providers::{
    AwsConfig, DispatchConfig, InferenceConfig, RetrievalConfig, ServiceConfig, StorageConfig,
    TaskConfig,
};
pub use relay::{destination::Destination, message::RelayMessage};
pub use session::{delivery::DeliveryResult, stream::StreamFragment};
