//! Request dispatcher
//!
//! Routes a classified [`Trigger`] to the component that handles it and
//! translates the outcome into a [`ResponseEnvelope`].

use crate::envelope::ResponseEnvelope;
use crate::trigger::{
    CONNECT_ROUTE, DISCONNECT_ROUTE, InferenceOrigin, InferencePayload, LifecycleEvent,
    PromptLibraryRequest, Trigger,
};
use relay_application::{
    ConnectionRegistry, DocumentStore, PromptStore, StreamCoordinator, TaskSubmitter,
};
use relay_domain::{Connection, DeliveryResult, DispatchConfig, ErrorKind, PromptTemplate};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Entry point for every trigger a worker receives
pub struct RequestDispatcher {
    coordinator: StreamCoordinator,
    registry: Arc<dyn ConnectionRegistry>,
    prompts: Arc<dyn PromptStore>,
    documents: Arc<dyn DocumentStore>,
    tasks: Arc<dyn TaskSubmitter>,
    forward_routes: Vec<String>,
}

impl RequestDispatcher {
    pub fn new(
        coordinator: StreamCoordinator,
        registry: Arc<dyn ConnectionRegistry>,
        prompts: Arc<dyn PromptStore>,
        documents: Arc<dyn DocumentStore>,
        tasks: Arc<dyn TaskSubmitter>,
    ) -> Self {
        Self {
            coordinator,
            registry,
            prompts,
            documents,
            tasks,
            forward_routes: DispatchConfig::default().forward_routes,
        }
    }

    /// WebSocket routes whose messages are handed to the async worker.
    pub fn with_forward_routes(mut self, routes: Vec<String>) -> Self {
        self.forward_routes = routes;
        self
    }

    /// Classify a raw event and dispatch it.
    pub async fn handle_event(&self, event: Value) -> ResponseEnvelope {
        match Trigger::from_event(event) {
            Ok(trigger) => self.dispatch(trigger).await,
            Err(e) => {
                warn!("Rejected trigger: {}", e);
                ResponseEnvelope::http_error(e.kind(), e.to_string())
            }
        }
    }

    pub async fn dispatch(&self, trigger: Trigger) -> ResponseEnvelope {
        match trigger {
            Trigger::Preflight => ResponseEnvelope::preflight(),
            Trigger::ConnectionLifecycle(event) => self.handle_lifecycle(event).await,
            Trigger::PromptLibrary(request) => self.handle_prompt_library(request).await,
            Trigger::Inference {
                payload,
                origin: InferenceOrigin::Http,
            } => self.handle_rest_inference(payload).await,
            Trigger::Inference {
                payload,
                origin: InferenceOrigin::Async,
            } => self.handle_async_inference(payload).await,
        }
    }

    // ==================== Connection lifecycle ====================

    async fn handle_lifecycle(&self, event: LifecycleEvent) -> ResponseEnvelope {
        let Some(connection_id) = event.connection_id.clone() else {
            warn!(route = %event.route_key, "Lifecycle event without connectionId");
            return ResponseEnvelope::socket_text(400, "Missing connectionId");
        };

        info!(route = %event.route_key, connection_id = %connection_id, "Lifecycle event");

        let route_key = event.route_key.clone();
        match route_key.as_str() {
            CONNECT_ROUTE => {
                let connection =
                    Connection::from_epoch_millis(&connection_id, event.request_time_epoch);
                match self.registry.put(&connection).await {
                    Ok(()) => ResponseEnvelope::socket_text(200, "Connected"),
                    Err(e) => {
                        error!(connection_id = %connection_id, "Error storing connection: {}", e);
                        ResponseEnvelope::socket_text(500, "Failed to connect")
                    }
                }
            }
            DISCONNECT_ROUTE => match self.registry.delete(&connection_id).await {
                Ok(()) => ResponseEnvelope::socket_text(200, "Disconnected"),
                Err(e) => {
                    error!(connection_id = %connection_id, "Error removing connection: {}", e);
                    ResponseEnvelope::socket_text(500, "Failed to disconnect")
                }
            },
            route if self.forward_routes.iter().any(|r| r == route) => {
                self.forward_message(connection_id, event).await
            }
            route => {
                warn!(route, "Unsupported route");
                ResponseEnvelope::socket_json(400, &json!({"error": "Unsupported route"}))
            }
        }
    }

    /// Hand a WebSocket message to the async worker, tagged with where to
    /// stream the answer.
    async fn forward_message(
        &self,
        connection_id: String,
        event: LifecycleEvent,
    ) -> ResponseEnvelope {
        let raw = event.body.as_deref().unwrap_or("{}");
        let mut body = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return ResponseEnvelope::socket_error(
                    ErrorKind::InvalidRequest,
                    "Message body must be a JSON object",
                );
            }
            Err(e) => {
                return ResponseEnvelope::socket_error(
                    ErrorKind::InvalidRequest,
                    format!("Invalid message body: {}", e),
                );
            }
        };

        body.insert("connectionId".to_string(), Value::String(connection_id));
        body.insert("domainName".to_string(), optional_string(event.domain_name));
        body.insert("stage".to_string(), optional_string(event.stage));

        match self.tasks.submit(Value::Object(body)).await {
            Ok(()) => {
                ResponseEnvelope::socket_json(200, &json!({"message": "Processing started"}))
            }
            Err(e) => {
                error!(route = %event.route_key, "Error forwarding message: {}", e);
                ResponseEnvelope::socket_error(e.kind(), e.to_string())
            }
        }
    }

    // ==================== Prompt library ====================

    async fn handle_prompt_library(&self, request: PromptLibraryRequest) -> ResponseEnvelope {
        match request {
            PromptLibraryRequest::List { scope } => {
                let Some(scope) = scope.filter(|s| !s.trim().is_empty()) else {
                    return ResponseEnvelope::http_error(
                        ErrorKind::InvalidRequest,
                        "Query parameter 'scope' is required",
                    );
                };
                match self.prompts.list(&scope).await {
                    Ok(templates) => match serde_json::to_value(&templates) {
                        Ok(body) => ResponseEnvelope::http(200, &body),
                        Err(e) => {
                            ResponseEnvelope::http_error(ErrorKind::StoreFailure, e.to_string())
                        }
                    },
                    Err(e) => {
                        error!(scope = %scope, "Error listing prompts: {}", e);
                        ResponseEnvelope::http_error(e.kind(), e.to_string())
                    }
                }
            }
            PromptLibraryRequest::Save(template) => self.save_prompt(template).await,
        }
    }

    async fn save_prompt(&self, template: PromptTemplate) -> ResponseEnvelope {
        if let Err(e) = template.validate() {
            return ResponseEnvelope::http_error(e.kind(), e.to_string());
        }
        match self.prompts.save(&template).await {
            Ok(()) => {
                info!(scope = %template.scope, title = %template.title, "Prompt saved");
                ResponseEnvelope::http(200, &json!({"message": "Prompt saved successfully"}))
            }
            Err(e) => {
                error!(scope = %template.scope, "Error saving prompt: {}", e);
                ResponseEnvelope::http_error(e.kind(), e.to_string())
            }
        }
    }

    // ==================== Inference ====================

    /// REST entry: buffered runs answer inline, streaming runs are handed
    /// to the worker and acknowledged immediately.
    async fn handle_rest_inference(&self, payload: InferencePayload) -> ResponseEnvelope {
        let destination = match payload.destination() {
            Ok(destination) => destination,
            Err(e) => return ResponseEnvelope::http_error(e.kind(), e.to_string()),
        };

        if destination.is_none() {
            return self.run_inline(payload).await;
        }

        if payload.prompt.as_deref().is_none_or(|p| p.trim().is_empty()) {
            return ResponseEnvelope::http_error(
                ErrorKind::InvalidRequest,
                "Prompt cannot be empty",
            );
        }

        let work = match serde_json::to_value(&payload) {
            Ok(work) => work,
            Err(e) => {
                return ResponseEnvelope::http_error(
                    ErrorKind::InvalidRequest,
                    format!("Failed to encode payload: {}", e),
                );
            }
        };

        match self.tasks.submit(work).await {
            Ok(()) => ResponseEnvelope::http(200, &json!({"message": "ok"})),
            Err(e) => {
                error!("Error submitting inference task: {}", e);
                ResponseEnvelope::http_error(e.kind(), e.to_string())
            }
        }
    }

    /// Worker entry: fetch the document if any, then run to completion.
    async fn handle_async_inference(&self, payload: InferencePayload) -> ResponseEnvelope {
        self.run_inline(payload).await
    }

    async fn run_inline(&self, payload: InferencePayload) -> ResponseEnvelope {
        let mut request = match payload.to_request() {
            Ok(request) => request,
            Err(e) => return ResponseEnvelope::http_error(e.kind(), e.to_string()),
        };

        if let Some(key) = payload.document_key() {
            match self.documents.fetch(key).await {
                Ok(bytes) => request = request.with_document(bytes),
                Err(e) => {
                    error!(key, "Error fetching document: {}", e);
                    return ResponseEnvelope::http_error(
                        ErrorKind::DocumentUnavailable,
                        format!("Failed to fetch document {}: {}", key, e),
                    );
                }
            }
        }

        let result = self.coordinator.run(request).await;
        delivery_response(result)
    }
}

fn delivery_response(result: DeliveryResult) -> ResponseEnvelope {
    match result.error {
        None => ResponseEnvelope::http(200, &json!({"response": result.full_text})),
        Some(kind) => ResponseEnvelope::http_error(kind, failure_message(kind)),
    }
}

fn failure_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidRequest => "Prompt is empty or the template is invalid",
        ErrorKind::InvalidDestination => "Destination needs both connectionId and domainName",
        ErrorKind::ContextUnavailable => "Failed to retrieve context from the knowledge base",
        ErrorKind::DocumentUnavailable => "Failed to fetch the document",
        ErrorKind::InferenceFailure => "Inference failed",
        ErrorKind::RelayFailure => "Failed to relay the response",
        ErrorKind::StoreFailure => "Storage request failed",
        ErrorKind::SubmissionFailure => "Failed to submit work",
    }
}

fn optional_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}
