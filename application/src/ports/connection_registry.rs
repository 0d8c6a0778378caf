//! Connection Registry port
//!
//! Persists which listeners are attached. There is no read
//! path: relays trust the destination carried by the trigger.

use super::store_error::StoreError;
use async_trait::async_trait;
use relay_domain::Connection;

#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    async fn put(&self, connection: &Connection) -> Result<(), StoreError>;

    /// Remove a connection. Removing an unknown id succeeds.
    async fn delete(&self, connection_id: &str) -> Result<(), StoreError>;
}
