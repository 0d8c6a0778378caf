//! AWS Bedrock ConverseStream provider
//!
//! Streams Claude output through the Bedrock Converse API using AWS IAM
//! authentication.

mod adapter;
mod model_map;
mod stream;
mod types;

pub use adapter::BedrockInferenceGateway;
