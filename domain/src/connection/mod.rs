//! Connection registry entities.

use chrono::{DateTime, TimeZone, Utc};

/// A remote listener believed to be attached (Entity)
///
/// Presence in the registry means the listener was reachable when it
/// connected; absence does not prove it is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: String,
    pub registered_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(id: impl Into<String>, registered_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            registered_at,
        }
    }

    /// Build from an epoch-millisecond timestamp, falling back to now when
    /// the value is absent or out of range.
    pub fn from_epoch_millis(id: impl Into<String>, millis: Option<i64>) -> Self {
        let registered_at = millis
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(Utc::now);
        Self::new(id, registered_at)
    }

    pub fn registered_at_millis(&self) -> i64 {
        self.registered_at.timestamp_millis()
    }
}
