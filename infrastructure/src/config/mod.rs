//! Configuration file loading for bedrock-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: deployment variables (`MODEL_ID`, `BUCKET_NAME`, ...) and
//!    `RELAY_`-prefixed keys (`RELAY_INFERENCE__MAX_TOKENS`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./relay.toml` or `./.relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/bedrock-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAwsConfig, FileConfig, FileDispatchConfig, FileInferenceConfig,
    FileRetrievalConfig, FileStorageConfig, FileTasksConfig,
};
pub use loader::ConfigLoader;
