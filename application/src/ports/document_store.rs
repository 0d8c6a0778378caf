//! Document Store port

use super::store_error::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the raw bytes of an uploaded document.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError>;
}
