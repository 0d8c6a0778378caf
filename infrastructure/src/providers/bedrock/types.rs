//! Type conversions between AWS Bedrock SDK and domain types
//!
//! Builds Converse request messages from a prompt (and optional PDF), and
//! converts ConverseStream events into domain [`StreamFragment`]s.

use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::converse_stream::ConverseStreamError;
use aws_sdk_bedrockruntime::types as bedrock;
use aws_smithy_types::Blob;
use aws_smithy_types::error::display::DisplayErrorContext;
use relay_application::GatewayError;
use relay_domain::StreamFragment;

/// Name attached to uploaded documents in the request.
pub const DOCUMENT_NAME: &str = "Document 1";

// ─── Domain → Bedrock ────────────────────────────────────────────

/// Build the single user message: document block first, then the prompt.
pub fn user_message(
    prompt: &str,
    document: Option<Vec<u8>>,
) -> Result<bedrock::Message, GatewayError> {
    let mut content = Vec::with_capacity(2);

    if let Some(bytes) = document {
        let block = bedrock::DocumentBlock::builder()
            .name(DOCUMENT_NAME)
            .format(bedrock::DocumentFormat::Pdf)
            .source(bedrock::DocumentSource::Bytes(Blob::new(bytes)))
            .build()
            .map_err(|e| {
                GatewayError::RequestFailed(format!("Failed to build document block: {}", e))
            })?;
        content.push(bedrock::ContentBlock::Document(block));
    }

    content.push(bedrock::ContentBlock::Text(prompt.to_string()));

    bedrock::Message::builder()
        .role(bedrock::ConversationRole::User)
        .set_content(Some(content))
        .build()
        .map_err(|e| GatewayError::RequestFailed(format!("Failed to build message: {}", e)))
}

// ─── Bedrock → Domain ────────────────────────────────────────────

/// Convert one stream event into a fragment.
///
/// Returns `None` for events that carry no text (block start/stop,
/// metadata, tool-use deltas).
pub fn convert_stream_event(event: &bedrock::ConverseStreamOutput) -> Option<StreamFragment> {
    match event {
        bedrock::ConverseStreamOutput::ContentBlockDelta(delta_event) => {
            match delta_event.delta() {
                Some(bedrock::ContentBlockDelta::Text(text)) => {
                    Some(StreamFragment::delta(text.clone()))
                }
                _ => None,
            }
        }
        bedrock::ConverseStreamOutput::MessageStop(_) => Some(StreamFragment::end()),
        _ => None,
    }
}

/// Convert a Bedrock SDK error to a GatewayError.
pub fn convert_converse_stream_error(err: &SdkError<ConverseStreamError>) -> GatewayError {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            ConverseStreamError::ThrottlingException(e) => {
                GatewayError::Throttled(format!("Bedrock throttled: {}", e))
            }
            ConverseStreamError::ModelNotReadyException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not ready: {}", e))
            }
            ConverseStreamError::ResourceNotFoundException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not found: {}", e))
            }
            ConverseStreamError::ValidationException(e) => {
                GatewayError::RequestFailed(format!("Bedrock validation error: {}", e))
            }
            ConverseStreamError::ModelTimeoutException(_) => GatewayError::Timeout,
            other => GatewayError::RequestFailed(format!("Bedrock error: {:?}", other)),
        },
        other => GatewayError::ConnectionError(format!(
            "Bedrock SDK error: {}",
            DisplayErrorContext(other)
        )),
    }
}
