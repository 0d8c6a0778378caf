//! DynamoDB-backed connection registry

use super::attributes::{self, CONNECTION_ID};
use super::request_failed;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use relay_application::{ConnectionRegistry, StoreError};
use relay_domain::Connection;
use tracing::debug;

pub struct DynamoConnectionRegistry {
    client: DynamoClient,
    table: String,
}

impl DynamoConnectionRegistry {
    pub fn new(sdk_config: &aws_config::SdkConfig, table: impl Into<String>) -> Self {
        Self {
            client: DynamoClient::new(sdk_config),
            table: table.into(),
        }
    }
}

#[async_trait]
impl ConnectionRegistry for DynamoConnectionRegistry {
    async fn put(&self, connection: &Connection) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(attributes::connection_item(connection)))
            .send()
            .await
            .map_err(|e| request_failed("PutItem", &e))?;

        debug!(connection_id = %connection.id, table = %self.table, "Connection registered");
        Ok(())
    }

    async fn delete(&self, connection_id: &str) -> Result<(), StoreError> {
        // DeleteItem on a missing key succeeds
        self.client
            .delete_item()
            .table_name(&self.table)
            .key(CONNECTION_ID, AttributeValue::S(connection_id.to_string()))
            .send()
            .await
            .map_err(|e| request_failed("DeleteItem", &e))?;

        debug!(connection_id, table = %self.table, "Connection removed");
        Ok(())
    }
}
