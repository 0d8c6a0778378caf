//! Final prompt assembly

use crate::core::error::DomainError;

pub const CONTEXT_PLACEHOLDER: &str = "{context}";
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Prefix applied to the question when a document is attached.
pub const DOCUMENT_PREFIX: &str = "Based on the document, ";

/// Builds the text sent to the model
pub struct PromptBuilder;

impl PromptBuilder {
    /// Template used when context is retrieved but the caller gave none
    pub fn default_context_template() -> &'static str {
        r#"Use the following context to answer the question.

<context>
{context}
</context>

Question: {question}"#
    }

    /// Build the final prompt.
    ///
    /// - template and context: both placeholders are required
    /// - context only: [`Self::default_context_template`]
    /// - template only: `{context}` becomes empty
    /// - neither: the raw question
    pub fn build(
        question: &str,
        template: Option<&str>,
        context: Option<&str>,
        has_document: bool,
    ) -> Result<String, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }

        let question = if has_document {
            format!("{DOCUMENT_PREFIX}{question}")
        } else {
            question.to_string()
        };

        let template = template.filter(|t| !t.trim().is_empty());

        match (template, context) {
            (Some(template), Some(context)) => {
                if !template.contains(CONTEXT_PLACEHOLDER) {
                    return Err(DomainError::MissingPlaceholder(CONTEXT_PLACEHOLDER));
                }
                if !template.contains(QUESTION_PLACEHOLDER) {
                    return Err(DomainError::MissingPlaceholder(QUESTION_PLACEHOLDER));
                }
                Ok(fill(template, context, &question))
            }
            (None, Some(context)) => Ok(fill(Self::default_context_template(), context, &question)),
            (Some(template), None) => Ok(fill(template, "", &question)),
            (None, None) => Ok(question),
        }
    }
}

/// Substitute both placeholders in one pass, so placeholder-looking text
/// inside the context or question is left alone.
fn fill(template: &str, context: &str, question: &str) -> String {
    template
        .split(CONTEXT_PLACEHOLDER)
        .map(|piece| piece.replace(QUESTION_PLACEHOLDER, question))
        .collect::<Vec<_>>()
        .join(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_prompt_passthrough() {
        let prompt = PromptBuilder::build("Summarize this", None, None, false).unwrap();
        assert_eq!(prompt, "Summarize this");
    }

    #[test]
    fn test_template_with_context() {
        let prompt = PromptBuilder::build(
            "What is the dosage?",
            Some("Context: {context}\nQ: {question}"),
            Some("Take two daily."),
            false,
        )
        .unwrap();
        assert_eq!(prompt, "Context: Take two daily.\nQ: What is the dosage?");
    }

    #[test]
    fn test_default_template_when_only_context() {
        let prompt = PromptBuilder::build("Why?", None, Some("Because."), false).unwrap();
        assert!(prompt.contains("<context>\nBecause.\n</context>"));
        assert!(prompt.ends_with("Question: Why?"));
    }

    #[test]
    fn test_template_without_context_blanks_placeholder() {
        let prompt =
            PromptBuilder::build("Why?", Some("[{context}] {question}"), None, false).unwrap();
        assert_eq!(prompt, "[] Why?");
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let err = PromptBuilder::build("Why?", Some("Only {question}"), Some("ctx"), false)
            .unwrap_err();
        assert_eq!(err, DomainError::MissingPlaceholder(CONTEXT_PLACEHOLDER));

        let err = PromptBuilder::build("Why?", Some("Only {context}"), Some("ctx"), false)
            .unwrap_err();
        assert_eq!(err, DomainError::MissingPlaceholder(QUESTION_PLACEHOLDER));
    }

    #[test]
    fn test_placeholders_inside_values_not_expanded() {
        let prompt = PromptBuilder::build(
            "say {context}",
            Some("{context} | {question}"),
            Some("ctx {question}"),
            false,
        )
        .unwrap();
        assert_eq!(prompt, "ctx {question} | say {context}");
    }

    #[test]
    fn test_document_prefix() {
        let prompt = PromptBuilder::build("list the findings", None, None, true).unwrap();
        assert_eq!(prompt, "Based on the document, list the findings");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert_eq!(
            PromptBuilder::build("  ", None, None, false).unwrap_err(),
            DomainError::EmptyPrompt
        );
    }
}
