//! Prompt request value objects

use crate::relay::destination::Destination;

/// Knowledge base lookup attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextQuery {
    /// Knowledge base identifier.
    pub source_id: String,
    /// Retrieval query text.
    pub query: String,
}

/// Everything one coordinator run needs. Built per invocation, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub prompt_text: String,
    /// Template with `{context}` and `{question}` placeholders.
    pub template: Option<String>,
    pub context: Option<ContextQuery>,
    /// Raw PDF bytes sent alongside the prompt.
    pub document: Option<Vec<u8>>,
    /// Present in streaming mode, absent in buffered mode.
    pub destination: Option<Destination>,
}

impl PromptRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            template: None,
            context: None,
            document: None,
            destination: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Enrich the prompt from a knowledge base, querying with the prompt text.
    pub fn with_context_source(mut self, source_id: impl Into<String>) -> Self {
        self.context = Some(ContextQuery {
            source_id: source_id.into(),
            query: self.prompt_text.clone(),
        });
        self
    }

    pub fn with_document(mut self, bytes: Vec<u8>) -> Self {
        self.document = Some(bytes);
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.destination.is_some()
    }
}
