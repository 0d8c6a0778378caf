//! Prompt Store port

use super::store_error::StoreError;
use async_trait::async_trait;
use relay_domain::PromptTemplate;

#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Save a record, overwriting any record with the same `(scope, title)`.
    async fn save(&self, template: &PromptTemplate) -> Result<(), StoreError>;

    async fn list(&self, scope: &str) -> Result<Vec<PromptTemplate>, StoreError>;
}
