//! Message Relay
//!
//! Delivers single frames to a listener over the push transport. Transport
//! errors are expected (listeners disconnect mid-stream) and are reported
//! as `false`, never escalated.

use crate::ports::push_transport::{PushTransport, TransportError};
use relay_domain::{Destination, ErrorKind, RelayMessage};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    #[error("Could not encode message: {0}")]
    Encode(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::InvalidDestination(_) => ErrorKind::InvalidDestination,
            RelayError::Encode(_) | RelayError::Transport(_) => ErrorKind::RelayFailure,
        }
    }
}

/// Sole user of the [`PushTransport`].
#[derive(Clone)]
pub struct MessageRelay {
    transport: Arc<dyn PushTransport>,
}

impl MessageRelay {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self { transport }
    }

    /// Deliver one message, logging and swallowing any failure.
    pub async fn deliver(&self, destination: &Destination, message: &RelayMessage) -> bool {
        match self.try_deliver(destination, message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    connection_id = %destination.connection_id,
                    kind = %e.kind(),
                    done = message.done,
                    "Relay delivery failed: {}",
                    e
                );
                false
            }
        }
    }

    /// Deliver one message with exactly one push attempt.
    pub async fn try_deliver(
        &self,
        destination: &Destination,
        message: &RelayMessage,
    ) -> Result<(), RelayError> {
        destination
            .validate()
            .map_err(|e| RelayError::InvalidDestination(e.to_string()))?;

        let payload = message
            .to_json_bytes()
            .map_err(|e| RelayError::Encode(e.to_string()))?;

        debug!(
            connection_id = %destination.connection_id,
            bytes = payload.len(),
            done = message.done,
            "Pushing relay frame"
        );

        self.transport
            .post(&destination.endpoint(), &destination.connection_id, payload)
            .await?;
        Ok(())
    }
}
