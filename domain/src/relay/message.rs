//! Relay frame sent to a listener

use serde::{Deserialize, Serialize};

/// One push frame: `{ "chunk": .., "done": .., "fullResponse"?: .. }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessage {
    pub chunk: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_response: Option<String>,
}

impl RelayMessage {
    /// An intermediate fragment.
    pub fn chunk(text: impl Into<String>) -> Self {
        Self {
            chunk: text.into(),
            done: false,
            full_response: None,
        }
    }

    /// The terminal frame carrying everything accumulated so far.
    pub fn done(full_response: impl Into<String>) -> Self {
        Self {
            chunk: String::new(),
            done: true,
            full_response: Some(full_response.into()),
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
