//! Stream Coordinator use case
//!
//! Builds the final prompt, runs one inference call and, per fragment,
//! either relays it to the listener (streaming mode) or only accumulates it
//! (buffered mode).
//!
//! Relay failures never stop iteration: the upstream call cannot be paused
//! once started, so a listener that went away only loses frames.

use crate::ports::context_retriever::{ContextRetriever, RetrievalError};
use crate::ports::inference_gateway::{
    GatewayError, InferenceGateway, InferenceRequest, StreamHandle,
};
use crate::use_cases::message_relay::MessageRelay;
use relay_domain::{
    ContextQuery, DeliveryResult, Destination, DomainError, ErrorKind, PromptBuilder,
    PromptRequest, RelayMessage,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a run before any text is generated
#[derive(Error, Debug)]
pub enum StreamCoordinatorError {
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(#[from] DomainError),

    #[error("Context unavailable: {0}")]
    ContextUnavailable(#[from] RetrievalError),

    #[error("Inference failed: {0}")]
    InferenceFailed(#[from] GatewayError),
}

impl StreamCoordinatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamCoordinatorError::InvalidPrompt(e) => e.kind(),
            StreamCoordinatorError::ContextUnavailable(e) => e.kind(),
            StreamCoordinatorError::InferenceFailed(e) => e.kind(),
        }
    }
}

/// Orchestrates retrieval, inference and relay for one request
pub struct StreamCoordinator {
    gateway: Arc<dyn InferenceGateway>,
    retriever: Arc<dyn ContextRetriever>,
    relay: MessageRelay,
}

/// Counters gathered while draining a stream.
#[derive(Debug, Default)]
struct StreamTally {
    fragments: usize,
    failed_relays: usize,
}

impl StreamCoordinator {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        retriever: Arc<dyn ContextRetriever>,
        relay: MessageRelay,
    ) -> Self {
        Self {
            gateway,
            retriever,
            relay,
        }
    }

    /// Run one request to completion.
    ///
    /// Never returns an error: every failure is folded into the
    /// [`DeliveryResult`] so callers in either delivery mode see one shape.
    pub async fn run(&self, request: PromptRequest) -> DeliveryResult {
        let PromptRequest {
            prompt_text,
            template,
            context,
            document,
            destination,
        } = request;

        info!(
            streaming = destination.is_some(),
            with_context = context.is_some(),
            with_document = document.is_some(),
            "Starting relay run"
        );

        let prepared = self
            .prepare_prompt(
                &prompt_text,
                template.as_deref(),
                context.as_ref(),
                document.is_some(),
            )
            .await;
        let prompt = match prepared {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(kind = %e.kind(), "Run aborted before inference: {}", e);
                return DeliveryResult::failed(e.kind());
            }
        };

        let inference = InferenceRequest::new(prompt).with_document(document);
        let handle = match self.gateway.stream(inference).await {
            Ok(handle) => handle,
            Err(e) => {
                // Nothing was generated, so a listener has nothing to finish.
                let e = StreamCoordinatorError::from(e);
                warn!(kind = %e.kind(), "Inference did not start: {}", e);
                return DeliveryResult::failed(e.kind());
            }
        };

        self.drain(handle, destination.as_ref()).await
    }

    /// Validate, retrieve context and assemble the final prompt.
    async fn prepare_prompt(
        &self,
        prompt_text: &str,
        template: Option<&str>,
        context: Option<&ContextQuery>,
        has_document: bool,
    ) -> Result<String, StreamCoordinatorError> {
        if prompt_text.trim().is_empty() {
            return Err(DomainError::EmptyPrompt.into());
        }

        let retrieved = match context {
            Some(query) => {
                debug!(source_id = %query.source_id, "Retrieving context");
                Some(self.retriever.retrieve(query).await?)
            }
            None => None,
        };

        Ok(PromptBuilder::build(
            prompt_text,
            template,
            retrieved.as_deref(),
            has_document,
        )?)
    }

    /// Consume the stream in order, relaying or buffering each fragment.
    async fn drain(
        &self,
        mut handle: StreamHandle,
        destination: Option<&Destination>,
    ) -> DeliveryResult {
        let mut full_text = String::new();
        let mut tally = StreamTally::default();
        let mut failure: Option<GatewayError> = None;

        while let Some(item) = handle.next().await {
            match item {
                Ok(fragment) => {
                    if !fragment.is_final || fragment.has_text() {
                        tally.fragments += 1;
                        full_text.push_str(&fragment.text);
                        if let Some(destination) = destination
                            && !self
                                .relay
                                .deliver(destination, &RelayMessage::chunk(&fragment.text))
                                .await
                        {
                            tally.failed_relays += 1;
                        }
                    }
                    if fragment.is_final {
                        break;
                    }
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = &failure
            && tally.fragments == 0
        {
            warn!("Inference failed before the first fragment: {}", e);
            return DeliveryResult::failed(ErrorKind::InferenceFailure);
        }

        if let Some(destination) = destination
            && !self
                .relay
                .deliver(destination, &RelayMessage::done(&full_text))
                .await
        {
            tally.failed_relays += 1;
        }

        match failure {
            Some(e) => {
                warn!(
                    fragments = tally.fragments,
                    chars = full_text.len(),
                    "Inference failed mid-stream: {}",
                    e
                );
                DeliveryResult::partial(full_text, ErrorKind::InferenceFailure)
            }
            None => {
                info!(
                    fragments = tally.fragments,
                    failed_relays = tally.failed_relays,
                    chars = full_text.len(),
                    "Relay run complete"
                );
                DeliveryResult::delivered(full_text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::push_transport::{PushTransport, TransportError};
    use async_trait::async_trait;
    use relay_domain::StreamFragment;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    /// Scripted stream item: a fragment, or an error in its place.
    enum Step {
        Text(&'static str),
        End,
        Fail,
    }

    struct ScriptedGateway {
        scripts: Mutex<VecDeque<Result<Vec<Step>, GatewayError>>>,
        prompts: Mutex<Vec<InferenceRequest>>,
    }

    impl ScriptedGateway {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                scripts: Mutex::new(VecDeque::from(vec![Ok(steps)])),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                scripts: Mutex::new(VecDeque::from(vec![Err(GatewayError::Throttled(
                    "slow down".to_string(),
                ))])),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().unwrap().prompt.clone()
        }
    }

    #[async_trait]
    impl InferenceGateway for ScriptedGateway {
        async fn stream(&self, request: InferenceRequest) -> Result<StreamHandle, GatewayError> {
            self.prompts.lock().unwrap().push(request);
            let steps = self
                .scripts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("no script".to_string())))?;

            let (tx, handle) = StreamHandle::channel(steps.len() + 1);
            for step in steps {
                let item = match step {
                    Step::Text(text) => Ok(StreamFragment::delta(text)),
                    Step::End => Ok(StreamFragment::end()),
                    Step::Fail => Err(GatewayError::StreamInterrupted("reset".to_string())),
                };
                tx.try_send(item).unwrap();
            }
            Ok(handle)
        }
    }

    struct StaticRetriever {
        result: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl StaticRetriever {
        fn ok(text: &'static str) -> Self {
            Self {
                result: Ok(text),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err("knowledge base offline"),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContextRetriever for StaticRetriever {
        async fn retrieve(&self, _query: &ContextQuery) -> Result<String, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map(str::to_string)
                .map_err(|e| RetrievalError::RequestFailed(e.to_string()))
        }
    }

    /// Records every frame; optionally fails every push.
    struct RecordingTransport {
        frames: Mutex<Vec<serde_json::Value>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                frames: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                frames: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn frames(&self) -> Vec<serde_json::Value> {
            self.frames.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PushTransport for RecordingTransport {
        async fn post(
            &self,
            _endpoint: &str,
            connection_id: &str,
            payload: Vec<u8>,
        ) -> Result<(), TransportError> {
            self.frames
                .lock()
                .unwrap()
                .push(serde_json::from_slice(&payload).unwrap());
            if self.fail {
                Err(TransportError::Gone(connection_id.to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn coordinator(
        gateway: Arc<ScriptedGateway>,
        retriever: Arc<StaticRetriever>,
        transport: Arc<RecordingTransport>,
    ) -> StreamCoordinator {
        StreamCoordinator::new(gateway, retriever, MessageRelay::new(transport))
    }

    fn no_context() -> Arc<StaticRetriever> {
        Arc::new(StaticRetriever::ok(""))
    }

    fn destination() -> Destination {
        Destination::new("conn-1", "wss://abc.execute-api.us-west-2.amazonaws.com/prod")
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_streaming_relays_each_fragment_then_one_terminal() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Text("Hello "),
            Step::Text("world"),
            Step::End,
        ]));
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(
            gateway.clone(),
            no_context(),
            transport.clone(),
        );

        let result = coordinator
            .run(PromptRequest::new("Summarize this").with_destination(destination()))
            .await;

        assert_eq!(result, DeliveryResult::delivered("Hello world"));
        assert_eq!(
            transport.frames(),
            vec![
                serde_json::json!({"chunk": "Hello ", "done": false}),
                serde_json::json!({"chunk": "world", "done": false}),
                serde_json::json!({"chunk": "", "done": true, "fullResponse": "Hello world"}),
            ]
        );
        assert_eq!(gateway.last_prompt(), "Summarize this");
    }

    #[tokio::test]
    async fn test_buffered_mode_makes_no_relay_calls() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Text("Hello "),
            Step::Text("world"),
            Step::End,
        ]));
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator.run(PromptRequest::new("Summarize this")).await;

        assert_eq!(result.full_text, "Hello world");
        assert!(result.is_success());
        assert!(transport.frames().is_empty());
    }

    #[tokio::test]
    async fn test_context_failure_aborts_before_inference() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Text("never"), Step::End]));
        let retriever = Arc::new(StaticRetriever::failing());
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway.clone(), retriever.clone(), transport.clone());

        let result = coordinator
            .run(
                PromptRequest::new("What is covered?")
                    .with_context_source("KB1")
                    .with_destination(destination()),
            )
            .await;

        assert_eq!(result, DeliveryResult::failed(ErrorKind::ContextUnavailable));
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.call_count(), 0);
        assert!(transport.frames().is_empty());
    }

    #[tokio::test]
    async fn test_mid_stream_failure_sends_partial_terminal() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Text("partial"), Step::Fail]));
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator
            .run(PromptRequest::new("Summarize this").with_destination(destination()))
            .await;

        assert_eq!(
            result,
            DeliveryResult::partial("partial", ErrorKind::InferenceFailure)
        );
        let frames = transport.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[1],
            serde_json::json!({"chunk": "", "done": true, "fullResponse": "partial"})
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_before_first_fragment_sends_nothing() {
        let gateway = Arc::new(ScriptedGateway::failing());
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator
            .run(PromptRequest::new("Summarize this").with_destination(destination()))
            .await;

        assert_eq!(result, DeliveryResult::failed(ErrorKind::InferenceFailure));
        assert!(transport.frames().is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_as_first_item_sends_nothing() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Fail]));
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator
            .run(PromptRequest::new("Summarize this").with_destination(destination()))
            .await;

        assert_eq!(result.error, Some(ErrorKind::InferenceFailure));
        assert!(transport.frames().is_empty());
    }

    #[tokio::test]
    async fn test_terminal_sent_once_even_when_every_push_fails() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Text("a"),
            Step::Text("b"),
            Step::Text("c"),
            Step::End,
        ]));
        let transport = Arc::new(RecordingTransport::failing());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator
            .run(PromptRequest::new("Spell it").with_destination(destination()))
            .await;

        assert_eq!(result, DeliveryResult::delivered("abc"));
        let frames = transport.frames();
        assert_eq!(frames.len(), 4);
        let terminals: Vec<_> = frames.iter().filter(|f| f["done"] == true).collect();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0]["fullResponse"], "abc");
    }

    #[tokio::test]
    async fn test_relayed_chunks_reassemble_full_text_in_order() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Text("The "),
            Step::Text("quick "),
            Step::Text(""),
            Step::Text("brown "),
            Step::Text("fox"),
            Step::End,
        ]));
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator
            .run(PromptRequest::new("Finish the phrase").with_destination(destination()))
            .await;

        let reassembled: String = transport
            .frames()
            .iter()
            .filter(|f| f["done"] == false)
            .map(|f| f["chunk"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(reassembled, result.full_text);
        assert_eq!(reassembled, "The quick brown fox");
    }

    #[tokio::test]
    async fn test_stream_without_end_marker_still_terminates() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Text("open-ended")]));
        let transport = Arc::new(RecordingTransport::new());
        let coordinator = coordinator(gateway, no_context(), transport.clone());

        let result = coordinator
            .run(PromptRequest::new("Go").with_destination(destination()))
            .await;

        assert_eq!(result, DeliveryResult::delivered("open-ended"));
        assert_eq!(transport.frames().len(), 2);
    }

    #[tokio::test]
    async fn test_context_is_spliced_into_template() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::End]));
        let coordinator = coordinator(
            gateway.clone(),
            Arc::new(StaticRetriever::ok("Policy covers dental.")),
            Arc::new(RecordingTransport::new()),
        );

        coordinator
            .run(
                PromptRequest::new("Is dental covered?")
                    .with_template("Context: {context}\nQuestion: {question}")
                    .with_context_source("KB1"),
            )
            .await;

        assert_eq!(
            gateway.last_prompt(),
            "Context: Policy covers dental.\nQuestion: Is dental covered?"
        );
    }

    #[tokio::test]
    async fn test_document_prompt_is_prefixed_and_bytes_forwarded() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Text("Two findings."), Step::End]));
        let coordinator = coordinator(
            gateway.clone(),
            no_context(),
            Arc::new(RecordingTransport::new()),
        );

        let result = coordinator
            .run(PromptRequest::new("list the findings").with_document(b"%PDF-1.7".to_vec()))
            .await;

        assert_eq!(result.full_text, "Two findings.");
        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts[0].prompt, "Based on the document, list the findings");
        assert_eq!(prompts[0].document.as_deref(), Some(&b"%PDF-1.7"[..]));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_without_calls() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::End]));
        let retriever = no_context();
        let coordinator = coordinator(
            gateway.clone(),
            retriever.clone(),
            Arc::new(RecordingTransport::new()),
        );

        let result = coordinator
            .run(PromptRequest::new("   ").with_context_source("KB1"))
            .await;

        assert_eq!(result, DeliveryResult::failed(ErrorKind::InvalidRequest));
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_template_missing_placeholder_is_invalid_request() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::End]));
        let coordinator = coordinator(
            gateway.clone(),
            Arc::new(StaticRetriever::ok("ctx")),
            Arc::new(RecordingTransport::new()),
        );

        let result = coordinator
            .run(
                PromptRequest::new("Why?")
                    .with_template("No placeholders here")
                    .with_context_source("KB1"),
            )
            .await;

        assert_eq!(result.error, Some(ErrorKind::InvalidRequest));
        assert_eq!(gateway.call_count(), 0);
    }
}
