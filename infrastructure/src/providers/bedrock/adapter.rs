//! Bedrock inference gateway
//!
//! Implements [`InferenceGateway`] over the ConverseStream API. Prompts with
//! an attached document use the document model and token limit.

use super::{model_map, stream, types};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types as bedrock;
use relay_application::{GatewayError, InferenceGateway, InferenceRequest, StreamHandle};
use relay_domain::InferenceConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// Fragments buffered between the SDK pump and the coordinator.
const STREAM_BUFFER: usize = 64;

pub struct BedrockInferenceGateway {
    client: Arc<BedrockClient>,
    model_id: String,
    document_model_id: String,
    max_tokens: i32,
    document_max_tokens: i32,
    temperature: f32,
}

impl BedrockInferenceGateway {
    /// Create a gateway from a loaded SDK config.
    pub fn new(
        sdk_config: &aws_config::SdkConfig,
        config: &InferenceConfig,
        region: &str,
    ) -> Self {
        let model_id =
            model_map::to_bedrock_model_id(&config.model_id, config.cross_region, region);
        let document_model_id =
            model_map::to_bedrock_model_id(config.document_model_id(), config.cross_region, region);

        info!(
            model = %model_id,
            document_model = %document_model_id,
            "Bedrock gateway initialized"
        );

        Self {
            client: Arc::new(BedrockClient::new(sdk_config)),
            model_id,
            document_model_id,
            max_tokens: clamp_tokens(config.max_tokens),
            document_max_tokens: clamp_tokens(config.document_max_tokens),
            temperature: config.temperature,
        }
    }

    fn model_for(&self, request: &InferenceRequest) -> (&str, i32) {
        if request.document.is_some() {
            (&self.document_model_id, self.document_max_tokens)
        } else {
            (&self.model_id, self.max_tokens)
        }
    }
}

fn clamp_tokens(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[async_trait]
impl InferenceGateway for BedrockInferenceGateway {
    async fn stream(&self, request: InferenceRequest) -> Result<StreamHandle, GatewayError> {
        let (model_id, max_tokens) = self.model_for(&request);
        let model_id = model_id.to_string();
        let has_document = request.document.is_some();
        let message = types::user_message(&request.prompt, request.document)?;

        debug!(
            model = %model_id,
            has_document,
            prompt_len = request.prompt.len(),
            "Calling Bedrock ConverseStream API"
        );

        let output = self
            .client
            .converse_stream()
            .model_id(&model_id)
            .messages(message)
            .inference_config(
                bedrock::InferenceConfiguration::builder()
                    .max_tokens(max_tokens)
                    .temperature(self.temperature)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| types::convert_converse_stream_error(&e))?;

        let (tx, handle) = StreamHandle::channel(STREAM_BUFFER);
        tokio::spawn(stream::pump(output.stream, tx));

        Ok(handle)
    }
}
