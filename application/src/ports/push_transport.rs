//! Push Transport port
//!
//! The raw "post these bytes to that connection" capability. Only
//! [`MessageRelay`](crate::use_cases::message_relay::MessageRelay) calls it.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    /// The listener is no longer attached.
    #[error("Connection gone: {0}")]
    Gone(String),

    #[error("Push failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    /// One push attempt. No retries.
    async fn post(
        &self,
        endpoint: &str,
        connection_id: &str,
        payload: Vec<u8>,
    ) -> Result<(), TransportError>;
}
