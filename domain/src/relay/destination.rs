//! Destination value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

const SECURE_WEBSOCKET_PREFIX: &str = "wss://";

/// A push target: one listener on one WebSocket endpoint (Value Object)
///
/// Fields are not validated on construction; the relay checks them before
/// every push so that a bad destination costs no network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub connection_id: String,
    pub address: String,
}

impl Destination {
    pub fn new(connection_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            address: address.into(),
        }
    }

    /// Resolve the delivery mode from the optional parts of a trigger.
    ///
    /// Both absent means buffered delivery (`Ok(None)`); exactly one
    /// present is an error.
    pub fn from_parts(
        connection_id: Option<String>,
        address: Option<String>,
    ) -> Result<Option<Self>, DomainError> {
        let connection_id = connection_id.filter(|s| !s.trim().is_empty());
        let address = address.filter(|s| !s.trim().is_empty());

        match (connection_id, address) {
            (None, None) => Ok(None),
            (Some(connection_id), Some(address)) => Ok(Some(Self::new(connection_id, address))),
            (Some(_), None) => Err(DomainError::InvalidDestination(
                "connectionId given without domainName".to_string(),
            )),
            (None, Some(_)) => Err(DomainError::InvalidDestination(
                "domainName given without connectionId".to_string(),
            )),
        }
    }

    /// Check that both parts are present.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.connection_id.trim().is_empty() {
            return Err(DomainError::InvalidDestination(
                "empty connection id".to_string(),
            ));
        }
        if self.normalized_address().trim().is_empty() {
            return Err(DomainError::InvalidDestination("empty address".to_string()));
        }
        Ok(())
    }

    /// Address with any `wss://` prefix removed.
    pub fn normalized_address(&self) -> &str {
        self.address
            .strip_prefix(SECURE_WEBSOCKET_PREFIX)
            .unwrap_or(&self.address)
    }

    /// HTTPS endpoint of the management API serving this address.
    pub fn endpoint(&self) -> String {
        format!("https://{}", self.normalized_address().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_secure_websocket_prefix() {
        let dest = Destination::new("c1", "wss://abc.execute-api.us-west-2.amazonaws.com/prod");
        assert_eq!(
            dest.normalized_address(),
            "abc.execute-api.us-west-2.amazonaws.com/prod"
        );
        assert_eq!(
            dest.endpoint(),
            "https://abc.execute-api.us-west-2.amazonaws.com/prod"
        );
    }

    #[test]
    fn test_plain_address_untouched() {
        let dest = Destination::new("c1", "abc.example.com");
        assert_eq!(dest.normalized_address(), "abc.example.com");
    }

    #[test]
    fn test_validate_rejects_empty_parts() {
        assert!(Destination::new("", "abc.example.com").validate().is_err());
        assert!(Destination::new("c1", "").validate().is_err());
        assert!(Destination::new("c1", "wss://").validate().is_err());
        assert!(Destination::new("c1", "abc.example.com").validate().is_ok());
    }

    #[test]
    fn test_from_parts_resolves_mode() {
        assert_eq!(Destination::from_parts(None, None).unwrap(), None);
        assert_eq!(
            Destination::from_parts(Some("".to_string()), None).unwrap(),
            None
        );

        let dest = Destination::from_parts(Some("c1".to_string()), Some("host".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(dest.connection_id, "c1");

        assert!(Destination::from_parts(Some("c1".to_string()), None).is_err());
        assert!(Destination::from_parts(None, Some("host".to_string())).is_err());
    }
}
