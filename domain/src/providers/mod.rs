//! Service configuration types (provider-neutral, serde-free).
//!
//! These types define the shape of the managed-service settings without
//! depending on any serialization format (TOML, env, etc.).

/// Top-level service configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub aws: AwsConfig,
    pub inference: InferenceConfig,
    pub retrieval: RetrievalConfig,
    pub storage: StorageConfig,
    pub tasks: TaskConfig,
    pub dispatch: DispatchConfig,
}

/// Shared AWS client settings.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// AWS region (default: "us-west-2").
    pub region: String,
    /// AWS profile name for credentials.
    pub profile: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-west-2".to_string(),
            profile: None,
        }
    }
}

/// Bedrock inference settings.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Model used for text prompts.
    pub model_id: String,
    /// Model used when a document is attached (default: same as `model_id`).
    pub document_model_id: Option<String>,
    /// Max tokens for text prompts (default: 4096).
    pub max_tokens: u32,
    /// Max tokens when a document is attached (default: 2000).
    pub document_max_tokens: u32,
    pub temperature: f32,
    /// Prefix model ids with the region group inference profile.
    pub cross_region: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_id: "anthropic.claude-3-5-sonnet-20241022-v2:0".to_string(),
            document_model_id: None,
            max_tokens: 4096,
            document_max_tokens: 2000,
            temperature: 0.0,
            cross_region: false,
        }
    }
}

impl InferenceConfig {
    pub fn document_model_id(&self) -> &str {
        self.document_model_id.as_deref().unwrap_or(&self.model_id)
    }
}

/// Knowledge base retrieval settings.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Results pulled per query (default: 1).
    pub number_of_results: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            number_of_results: 1,
        }
    }
}

/// Table and bucket names.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub connections_table: String,
    pub prompts_table: String,
    /// Bucket holding uploaded documents. Document requests fail without it.
    pub document_bucket: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connections_table: "relay-connections".to_string(),
            prompts_table: "relay-prompts".to_string(),
            document_bucket: None,
        }
    }
}

/// Async work submission.
#[derive(Debug, Clone, Default)]
pub struct TaskConfig {
    /// Function invoked with streaming payloads. Submission fails without it.
    pub worker_function: Option<String>,
}

/// Dispatcher behavior.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Custom WebSocket routes forwarded to the async worker.
    pub forward_routes: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            forward_routes: vec!["processImage".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_model_falls_back_to_text_model() {
        let mut config = InferenceConfig::default();
        assert_eq!(config.document_model_id(), config.model_id);

        config.document_model_id = Some("anthropic.claude-3-haiku-20240307-v1:0".to_string());
        assert_eq!(
            config.document_model_id(),
            "anthropic.claude-3-haiku-20240307-v1:0"
        );
    }
}
