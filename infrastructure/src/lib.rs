//! Infrastructure layer for bedrock-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;
pub mod push;
pub mod storage;
pub mod tasks;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use providers::{
    bedrock::BedrockInferenceGateway, knowledge_base::KnowledgeBaseRetriever, load_sdk_config,
};
pub use push::api_gateway::ApiGatewayPushTransport;
pub use storage::{
    connections::DynamoConnectionRegistry, documents::S3DocumentStore,
    prompts::DynamoPromptStore,
};
pub use tasks::lambda::LambdaTaskSubmitter;
