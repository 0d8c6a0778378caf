//! Trigger classification
//!
//! Every invocation arrives as one JSON event. [`Trigger::from_event`]
//! decides once which kind it is; nothing downstream re-inspects the raw
//! event.

use relay_domain::{Destination, DomainError, ErrorKind, PromptRequest, PromptTemplate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const CONNECT_ROUTE: &str = "$connect";
pub const DISCONNECT_ROUTE: &str = "$disconnect";
/// Final path segments served by the prompt library.
const PROMPTS_PATH_SEGMENTS: [&str; 2] = ["prompts", "manage-prompts"];

/// Errors raised while classifying a trigger
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Trigger must be a JSON object")]
    NotAnObject,

    #[error("Request body is required")]
    MissingBody,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
}

impl TriggerError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidRequest
    }
}

/// Fields accepted by the inference entry points.
///
/// Unknown fields are ignored. Serializes back to the same names so a
/// payload can be handed to the async worker unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferencePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(rename = "bedrockKBID", default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<String>,
    #[serde(rename = "connectionId", default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(rename = "domainName", default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(rename = "s3FileKey", default, skip_serializing_if = "Option::is_none")]
    pub document_key: Option<String>,
    /// Carried for compatibility; the push endpoint is derived from the
    /// domain name alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl InferencePayload {
    pub fn destination(&self) -> Result<Option<Destination>, DomainError> {
        Destination::from_parts(self.connection_id.clone(), self.domain_name.clone())
    }

    pub fn document_key(&self) -> Option<&str> {
        self.document_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Build the coordinator request. Blank optional fields count as absent.
    pub fn to_request(&self) -> Result<PromptRequest, DomainError> {
        let mut request = PromptRequest::new(self.prompt.clone().unwrap_or_default());

        if let Some(template) = non_blank(&self.prompt_template) {
            request = request.with_template(template);
        }
        if let Some(source_id) = non_blank(&self.knowledge_base_id) {
            request = request.with_context_source(source_id);
        }
        if let Some(destination) = self.destination()? {
            request = request.with_destination(destination);
        }
        Ok(request)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Which entry point an inference trigger came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceOrigin {
    /// REST `POST` with a JSON body
    Http,
    /// Raw payload handed to the worker
    Async,
}

/// A WebSocket route event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub route_key: String,
    pub connection_id: Option<String>,
    pub request_time_epoch: Option<i64>,
    pub domain_name: Option<String>,
    pub stage: Option<String>,
    pub body: Option<String>,
}

/// A call to the prompt library endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptLibraryRequest {
    List { scope: Option<String> },
    Save(PromptTemplate),
}

/// Classified trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// CORS preflight (`OPTIONS`)
    Preflight,
    ConnectionLifecycle(LifecycleEvent),
    PromptLibrary(PromptLibraryRequest),
    Inference {
        payload: InferencePayload,
        origin: InferenceOrigin,
    },
}

impl Trigger {
    pub fn from_event(event: Value) -> Result<Self, TriggerError> {
        let object = event.as_object().ok_or(TriggerError::NotAnObject)?;

        if let Some(method) = object.get("httpMethod").and_then(Value::as_str) {
            return Self::from_http(method, &event);
        }

        if let Some(route_key) = event
            .pointer("/requestContext/routeKey")
            .and_then(Value::as_str)
        {
            return Ok(Trigger::ConnectionLifecycle(lifecycle_event(
                route_key, &event,
            )));
        }

        let payload = serde_json::from_value(event)
            .map_err(|e| TriggerError::InvalidBody(e.to_string()))?;
        Ok(Trigger::Inference {
            payload,
            origin: InferenceOrigin::Async,
        })
    }

    fn from_http(method: &str, event: &Value) -> Result<Self, TriggerError> {
        let method = method.to_ascii_uppercase();
        if method == "OPTIONS" {
            return Ok(Trigger::Preflight);
        }

        if is_prompts_path(event) {
            return match method.as_str() {
                "GET" => Ok(Trigger::PromptLibrary(PromptLibraryRequest::List {
                    scope: scope_parameter(event),
                })),
                "POST" => Ok(Trigger::PromptLibrary(PromptLibraryRequest::Save(
                    parse_body(event)?,
                ))),
                _ => Err(TriggerError::UnsupportedMethod(method)),
            };
        }

        if method != "POST" {
            return Err(TriggerError::UnsupportedMethod(method));
        }
        Ok(Trigger::Inference {
            payload: parse_body(event)?,
            origin: InferenceOrigin::Http,
        })
    }
}

fn lifecycle_event(route_key: &str, event: &Value) -> LifecycleEvent {
    let context_str = |field: &str| {
        event
            .pointer(&format!("/requestContext/{field}"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    LifecycleEvent {
        route_key: route_key.to_string(),
        connection_id: context_str("connectionId"),
        request_time_epoch: event
            .pointer("/requestContext/requestTimeEpoch")
            .and_then(Value::as_i64),
        domain_name: context_str("domainName"),
        stage: context_str("stage"),
        body: event.get("body").and_then(Value::as_str).map(str::to_string),
    }
}

fn is_prompts_path(event: &Value) -> bool {
    ["path", "resource"].iter().any(|field| {
        event
            .get(*field)
            .and_then(Value::as_str)
            .and_then(|p| p.trim_end_matches('/').rsplit('/').next())
            .is_some_and(|segment| PROMPTS_PATH_SEGMENTS.contains(&segment))
    })
}

/// `scope` query parameter, falling back to the older `demo` name.
fn scope_parameter(event: &Value) -> Option<String> {
    let params = event.get("queryStringParameters")?;
    ["scope", "demo"]
        .iter()
        .find_map(|name| params.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

/// Parse the JSON body. API Gateway delivers it as a string; direct
/// invocations may pass an object.
fn parse_body<T: serde::de::DeserializeOwned>(event: &Value) -> Result<T, TriggerError> {
    match event.get("body") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            serde_json::from_str(raw).map_err(|e| TriggerError::InvalidBody(e.to_string()))
        }
        Some(body @ Value::Object(_)) => serde_json::from_value(body.clone())
            .map_err(|e| TriggerError::InvalidBody(e.to_string())),
        _ => Err(TriggerError::MissingBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preflight() {
        let trigger = Trigger::from_event(json!({"httpMethod": "OPTIONS", "path": "/prompts"}));
        assert_eq!(trigger.unwrap(), Trigger::Preflight);
    }

    #[test]
    fn test_connect_event() {
        let trigger = Trigger::from_event(json!({
            "requestContext": {
                "routeKey": "$connect",
                "connectionId": "L1=",
                "requestTimeEpoch": 1_700_000_000_000_i64,
                "domainName": "abc.execute-api.us-west-2.amazonaws.com",
                "stage": "prod"
            }
        }))
        .unwrap();

        match trigger {
            Trigger::ConnectionLifecycle(event) => {
                assert_eq!(event.route_key, CONNECT_ROUTE);
                assert_eq!(event.connection_id.as_deref(), Some("L1="));
                assert_eq!(event.request_time_epoch, Some(1_700_000_000_000));
                assert_eq!(event.stage.as_deref(), Some("prod"));
                assert_eq!(event.body, None);
            }
            other => panic!("expected lifecycle, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_list_with_legacy_parameter() {
        let trigger = Trigger::from_event(json!({
            "httpMethod": "GET",
            "resource": "/prompts",
            "queryStringParameters": {"demo": "healthcare"}
        }))
        .unwrap();

        assert_eq!(
            trigger,
            Trigger::PromptLibrary(PromptLibraryRequest::List {
                scope: Some("healthcare".to_string())
            })
        );
    }

    #[test]
    fn test_prompt_list_without_parameters() {
        let trigger = Trigger::from_event(json!({
            "httpMethod": "GET",
            "path": "/prod/prompts",
            "queryStringParameters": null
        }))
        .unwrap();

        assert_eq!(
            trigger,
            Trigger::PromptLibrary(PromptLibraryRequest::List { scope: None })
        );
    }

    #[test]
    fn test_prompt_save_parses_body() {
        let trigger = Trigger::from_event(json!({
            "httpMethod": "POST",
            "path": "/prompts",
            "body": r#"{"demo": "claims", "title": "Denials", "prompt": "List denials"}"#
        }))
        .unwrap();

        assert_eq!(
            trigger,
            Trigger::PromptLibrary(PromptLibraryRequest::Save(PromptTemplate::new(
                "claims",
                "Denials",
                "List denials"
            )))
        );
    }

    #[test]
    fn test_manage_prompts_routes() {
        let save = Trigger::from_event(json!({
            "httpMethod": "POST",
            "path": "/prod/manage-prompts",
            "body": r#"{"demo": "srb", "title": "Claim", "prompt": "Summarize the claim"}"#
        }))
        .unwrap();
        assert_eq!(
            save,
            Trigger::PromptLibrary(PromptLibraryRequest::Save(PromptTemplate::new(
                "srb",
                "Claim",
                "Summarize the claim"
            )))
        );

        let list = Trigger::from_event(json!({
            "httpMethod": "GET",
            "resource": "/manage-prompts",
            "queryStringParameters": {"demo": "srb"}
        }))
        .unwrap();
        assert_eq!(
            list,
            Trigger::PromptLibrary(PromptLibraryRequest::List {
                scope: Some("srb".to_string())
            })
        );
    }

    #[test]
    fn test_path_ending_in_prompts_is_not_library() {
        let trigger = Trigger::from_event(json!({
            "httpMethod": "POST",
            "path": "/saved-prompts",
            "body": r#"{"prompt": "hi"}"#
        }))
        .unwrap();
        assert!(matches!(trigger, Trigger::Inference { .. }));
    }

    #[test]
    fn test_rest_inference() {
        let trigger = Trigger::from_event(json!({
            "httpMethod": "POST",
            "path": "/generate",
            "body": r#"{"prompt": "Summarize", "bedrockKBID": "KB1"}"#
        }))
        .unwrap();

        match trigger {
            Trigger::Inference { payload, origin } => {
                assert_eq!(origin, InferenceOrigin::Http);
                assert_eq!(payload.prompt.as_deref(), Some("Summarize"));
                assert_eq!(payload.knowledge_base_id.as_deref(), Some("KB1"));
            }
            other => panic!("expected inference, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_payload_is_async_inference() {
        let trigger = Trigger::from_event(json!({
            "prompt": "Explain",
            "connectionId": "L1=",
            "domainName": "abc.example.com",
            "stage": "prod",
            "s3FileKey": "uploads/a.pdf"
        }))
        .unwrap();

        match trigger {
            Trigger::Inference { payload, origin } => {
                assert_eq!(origin, InferenceOrigin::Async);
                assert_eq!(payload.document_key(), Some("uploads/a.pdf"));
                assert!(payload.destination().unwrap().is_some());
            }
            other => panic!("expected inference, got {:?}", other),
        }
    }

    #[test]
    fn test_rest_without_body() {
        let result = Trigger::from_event(json!({"httpMethod": "POST", "path": "/generate"}));
        assert!(matches!(result, Err(TriggerError::MissingBody)));
    }

    #[test]
    fn test_rest_with_malformed_body() {
        let result = Trigger::from_event(json!({
            "httpMethod": "POST",
            "path": "/generate",
            "body": "{not json"
        }));
        assert!(matches!(result, Err(TriggerError::InvalidBody(_))));
    }

    #[test]
    fn test_non_object_event() {
        assert!(matches!(
            Trigger::from_event(json!(["prompt"])),
            Err(TriggerError::NotAnObject)
        ));
    }

    #[test]
    fn test_payload_to_request() {
        let payload = InferencePayload {
            prompt: Some("What is covered?".to_string()),
            prompt_template: Some("".to_string()),
            knowledge_base_id: Some("KB1".to_string()),
            ..Default::default()
        };

        let request = payload.to_request().unwrap();
        assert_eq!(request.template, None);
        assert_eq!(request.context.unwrap().source_id, "KB1");
        assert!(request.destination.is_none());
    }

    #[test]
    fn test_payload_with_partial_destination() {
        let payload = InferencePayload {
            prompt: Some("Hi".to_string()),
            connection_id: Some("L1=".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            payload.to_request(),
            Err(DomainError::InvalidDestination(_))
        ));
    }

    #[test]
    fn test_payload_serializes_wire_names() {
        let payload = InferencePayload {
            prompt: Some("Hi".to_string()),
            connection_id: Some("L1=".to_string()),
            domain_name: Some("abc.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"prompt": "Hi", "connectionId": "L1=", "domainName": "abc.example.com"})
        );
    }
}
