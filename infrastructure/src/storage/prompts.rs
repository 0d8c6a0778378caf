//! DynamoDB-backed prompt store
//!
//! Records are keyed by `scope` (partition) and `title` (sort), so a save
//! with an existing pair overwrites the previous record.

use super::attributes::{self, SCOPE};
use super::request_failed;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use relay_application::{PromptStore, StoreError};
use relay_domain::PromptTemplate;
use tracing::{debug, warn};

pub struct DynamoPromptStore {
    client: DynamoClient,
    table: String,
}

impl DynamoPromptStore {
    pub fn new(sdk_config: &aws_config::SdkConfig, table: impl Into<String>) -> Self {
        Self {
            client: DynamoClient::new(sdk_config),
            table: table.into(),
        }
    }
}

#[async_trait]
impl PromptStore for DynamoPromptStore {
    async fn save(&self, template: &PromptTemplate) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(attributes::prompt_item(template)))
            .send()
            .await
            .map_err(|e| request_failed("PutItem", &e))?;

        debug!(scope = %template.scope, title = %template.title, "Prompt saved");
        Ok(())
    }

    async fn list(&self, scope: &str) -> Result<Vec<PromptTemplate>, StoreError> {
        let mut templates = Vec::new();
        let mut start_key = None;

        loop {
            let page = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression("#scope = :scope")
                .expression_attribute_names("#scope", SCOPE)
                .expression_attribute_values(":scope", AttributeValue::S(scope.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| request_failed("Query", &e))?;

            for item in page.items() {
                match attributes::prompt_from_item(item) {
                    Ok(template) => templates.push(template),
                    Err(e) => warn!(scope, "Skipping prompt record: {}", e),
                }
            }

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(scope, count = templates.len(), "Prompts listed");
        Ok(templates)
    }
}
