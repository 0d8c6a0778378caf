//! Delivery outcome

use crate::core::error_kind::ErrorKind;
use serde::{Deserialize, Serialize};

/// Terminal outcome of one coordinator run (Value Object)
///
/// In streaming mode the listener, not the caller, consumes the text; the
/// result still carries `full_text` so both modes report the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub full_text: String,
    pub delivered: bool,
    pub error: Option<ErrorKind>,
}

impl DeliveryResult {
    pub fn delivered(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            delivered: true,
            error: None,
        }
    }

    pub fn failed(kind: ErrorKind) -> Self {
        Self {
            full_text: String::new(),
            delivered: false,
            error: Some(kind),
        }
    }

    /// A failure that still produced some text before it happened.
    pub fn partial(full_text: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            full_text: full_text.into(),
            delivered: false,
            error: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.delivered && self.error.is_none()
    }
}
