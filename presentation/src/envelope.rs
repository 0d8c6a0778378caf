//! Response envelopes returned to the invoking gateway

use relay_domain::ErrorKind;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,POST,OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// `{statusCode, headers, body}` with the body already encoded as a string.
///
/// HTTP responses carry the CORS headers; WebSocket lifecycle responses
/// carry none and omit the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseEnvelope {
    /// HTTP response with a JSON body.
    pub fn http(status_code: u16, body: &Value) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body: body.to_string(),
        }
    }

    /// Answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        }
    }

    /// WebSocket lifecycle response with a plain-text body.
    pub fn socket_text(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// WebSocket lifecycle response with a JSON body.
    pub fn socket_json(status_code: u16, body: &Value) -> Self {
        Self::socket_text(status_code, body.to_string())
    }

    /// HTTP error carrying the failure kind.
    pub fn http_error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::http(status_for(kind), &error_body(kind, message))
    }

    /// WebSocket error carrying the failure kind.
    pub fn socket_error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::socket_json(status_for(kind), &error_body(kind, message))
    }

    /// Decode the body as JSON, if it is JSON.
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

pub fn status_for(kind: ErrorKind) -> u16 {
    if kind.is_client_error() { 400 } else { 500 }
}

fn error_body(kind: ErrorKind, message: impl Into<String>) -> Value {
    json!({"error": message.into(), "kind": kind})
}

fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
