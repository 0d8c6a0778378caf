//! Lambda task submitter
//!
//! Hands a payload to the worker function with an asynchronous (`Event`)
//! invocation. The caller returns as soon as Lambda accepts the event.

use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::types::InvocationType;
use aws_smithy_types::Blob;
use aws_smithy_types::error::display::DisplayErrorContext;
use relay_application::{TaskError, TaskSubmitter};
use tracing::info;

pub struct LambdaTaskSubmitter {
    client: LambdaClient,
    function_name: Option<String>,
}

impl LambdaTaskSubmitter {
    pub fn new(sdk_config: &aws_config::SdkConfig, function_name: Option<String>) -> Self {
        Self {
            client: LambdaClient::new(sdk_config),
            function_name,
        }
    }
}

#[async_trait]
impl TaskSubmitter for LambdaTaskSubmitter {
    async fn submit(&self, payload: serde_json::Value) -> Result<(), TaskError> {
        let function_name = self.function_name.as_deref().ok_or(TaskError::NotConfigured)?;
        let body = serde_json::to_vec(&payload)
            .map_err(|e| TaskError::Failed(format!("Failed to encode payload: {}", e)))?;

        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|e| TaskError::Failed(DisplayErrorContext(&e).to_string()))?;

        info!(
            function = function_name,
            status = output.status_code(),
            "Task submitted"
        );
        Ok(())
    }
}
