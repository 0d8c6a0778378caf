//! Presentation layer for bedrock-relay
//!
//! This crate contains trigger classification, the request dispatcher,
//! response envelopes and CLI definitions.

pub mod cli;
pub mod dispatcher;
pub mod envelope;
pub mod trigger;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, PromptsAction};
pub use dispatcher::RequestDispatcher;
pub use envelope::ResponseEnvelope;
pub use trigger::{
    InferenceOrigin, InferencePayload, LifecycleEvent, PromptLibraryRequest, Trigger,
    TriggerError,
};
