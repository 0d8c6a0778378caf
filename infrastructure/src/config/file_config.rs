//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to the serde-free domain
//! [`ServiceConfig`] before any adapter sees them.

use relay_domain::{
    AwsConfig, DispatchConfig, InferenceConfig, RetrievalConfig, ServiceConfig, StorageConfig,
    TaskConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("inference.model_id cannot be empty")]
    EmptyModelId,

    #[error("{0} cannot be 0")]
    ZeroTokenLimit(&'static str),

    #[error("inference.temperature must be between 0 and 1, got {0}")]
    InvalidTemperature(String),

    #[error("retrieval.number_of_results cannot be 0")]
    ZeroRetrievalResults,

    #[error("{0} cannot be empty")]
    EmptyTableName(&'static str),
}

/// `[aws]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAwsConfig {
    /// AWS region (default: "us-west-2")
    pub region: String,
    /// AWS profile name for credentials
    pub profile: Option<String>,
}

impl Default for FileAwsConfig {
    fn default() -> Self {
        let defaults = AwsConfig::default();
        Self {
            region: defaults.region,
            profile: defaults.profile,
        }
    }
}

/// `[inference]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInferenceConfig {
    pub model_id: String,
    /// Model for document prompts (default: `model_id`)
    pub document_model_id: Option<String>,
    pub max_tokens: u32,
    pub document_max_tokens: u32,
    pub temperature: f32,
    /// Use region-group inference profiles (`us.`, `eu.`, ...)
    pub cross_region: bool,
}

impl Default for FileInferenceConfig {
    fn default() -> Self {
        let defaults = InferenceConfig::default();
        Self {
            model_id: defaults.model_id,
            document_model_id: defaults.document_model_id,
            max_tokens: defaults.max_tokens,
            document_max_tokens: defaults.document_max_tokens,
            temperature: defaults.temperature,
            cross_region: defaults.cross_region,
        }
    }
}

/// `[retrieval]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    pub number_of_results: u32,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            number_of_results: RetrievalConfig::default().number_of_results,
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub connections_table: String,
    pub prompts_table: String,
    pub document_bucket: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        let defaults = StorageConfig::default();
        Self {
            connections_table: defaults.connections_table,
            prompts_table: defaults.prompts_table,
            document_bucket: defaults.document_bucket,
        }
    }
}

/// `[tasks]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTasksConfig {
    /// Function receiving streaming payloads
    pub worker_function: Option<String>,
}

/// `[dispatch]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// WebSocket routes forwarded to the async worker
    pub forward_routes: Vec<String>,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            forward_routes: DispatchConfig::default().forward_routes,
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub aws: FileAwsConfig,
    pub inference: FileInferenceConfig,
    pub retrieval: FileRetrievalConfig,
    pub storage: FileStorageConfig,
    pub tasks: FileTasksConfig,
    pub dispatch: FileDispatchConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.inference.model_id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelId);
        }
        if self.inference.max_tokens == 0 {
            return Err(ConfigValidationError::ZeroTokenLimit("inference.max_tokens"));
        }
        if self.inference.document_max_tokens == 0 {
            return Err(ConfigValidationError::ZeroTokenLimit(
                "inference.document_max_tokens",
            ));
        }
        if !(0.0..=1.0).contains(&self.inference.temperature) {
            return Err(ConfigValidationError::InvalidTemperature(
                self.inference.temperature.to_string(),
            ));
        }
        if self.retrieval.number_of_results == 0 {
            return Err(ConfigValidationError::ZeroRetrievalResults);
        }
        if self.storage.connections_table.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTableName(
                "storage.connections_table",
            ));
        }
        if self.storage.prompts_table.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTableName("storage.prompts_table"));
        }
        Ok(())
    }

    /// Convert to the domain configuration, dropping blank optional values.
    pub fn to_service_config(&self) -> ServiceConfig {
        ServiceConfig {
            aws: AwsConfig {
                region: self.aws.region.clone(),
                profile: non_blank(&self.aws.profile),
            },
            inference: InferenceConfig {
                model_id: self.inference.model_id.clone(),
                document_model_id: non_blank(&self.inference.document_model_id),
                max_tokens: self.inference.max_tokens,
                document_max_tokens: self.inference.document_max_tokens,
                temperature: self.inference.temperature,
                cross_region: self.inference.cross_region,
            },
            retrieval: RetrievalConfig {
                number_of_results: self.retrieval.number_of_results,
            },
            storage: StorageConfig {
                connections_table: self.storage.connections_table.clone(),
                prompts_table: self.storage.prompts_table.clone(),
                document_bucket: non_blank(&self.storage.document_bucket),
            },
            tasks: TaskConfig {
                worker_function: non_blank(&self.tasks.worker_function),
            },
            dispatch: DispatchConfig {
                forward_routes: self.dispatch.forward_routes.clone(),
            },
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
