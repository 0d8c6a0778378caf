//! Managed AI service adapters
//!
//! - [`bedrock::BedrockInferenceGateway`] — streaming inference
//! - [`knowledge_base::KnowledgeBaseRetriever`] — context retrieval

pub mod bedrock;
pub mod knowledge_base;

use relay_domain::AwsConfig;
use tracing::info;

/// Resolve credentials and region once per worker.
///
/// Every AWS adapter is built from the returned config, so a worker holds
/// exactly one credential chain.
pub async fn load_sdk_config(config: &AwsConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(ref profile) = config.profile {
        loader = loader.profile_name(profile);
    }

    let sdk_config = loader.load().await;
    info!(region = %config.region, "AWS SDK configuration loaded");
    sdk_config
}
