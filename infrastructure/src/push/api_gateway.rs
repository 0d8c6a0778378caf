//! API Gateway Management push transport
//!
//! Posts relay frames to WebSocket connections. The management API is
//! addressed per stage, so one client is built per endpoint and cached for
//! the lifetime of the worker.

use async_trait::async_trait;
use aws_sdk_apigatewaymanagement::Client as ManagementClient;
use aws_sdk_apigatewaymanagement::config::Builder as ManagementConfigBuilder;
use aws_sdk_apigatewaymanagement::error::SdkError;
use aws_sdk_apigatewaymanagement::operation::post_to_connection::PostToConnectionError;
use aws_smithy_types::Blob;
use aws_smithy_types::error::display::DisplayErrorContext;
use relay_application::{PushTransport, TransportError};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

pub struct ApiGatewayPushTransport {
    sdk_config: aws_config::SdkConfig,
    clients: Mutex<HashMap<String, ManagementClient>>,
}

impl ApiGatewayPushTransport {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    async fn client_for(&self, endpoint: &str) -> ManagementClient {
        let mut clients = self.clients.lock().await;
        clients
            .entry(endpoint.to_string())
            .or_insert_with(|| {
                debug!(endpoint, "Creating management client");
                let config = ManagementConfigBuilder::from(&self.sdk_config)
                    .endpoint_url(endpoint)
                    .build();
                ManagementClient::from_conf(config)
            })
            .clone()
    }
}

#[async_trait]
impl PushTransport for ApiGatewayPushTransport {
    async fn post(
        &self,
        endpoint: &str,
        connection_id: &str,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        let client = self.client_for(endpoint).await;

        client
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(payload))
            .send()
            .await
            .map_err(|e| convert_post_error(connection_id, &e))?;

        Ok(())
    }
}

fn convert_post_error(
    connection_id: &str,
    err: &SdkError<PostToConnectionError>,
) -> TransportError {
    if let SdkError::ServiceError(service_err) = err
        && matches!(service_err.err(), PostToConnectionError::GoneException(_))
    {
        return TransportError::Gone(connection_id.to_string());
    }
    TransportError::Failed(DisplayErrorContext(err).to_string())
}
