//! Bedrock knowledge base retriever
//!
//! Runs a vector search against a knowledge base and joins the returned
//! passages into one context block.

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client as AgentRuntimeClient;
use aws_sdk_bedrockagentruntime::error::SdkError;
use aws_sdk_bedrockagentruntime::operation::retrieve::RetrieveError;
use aws_sdk_bedrockagentruntime::types as kb;
use aws_smithy_types::error::display::DisplayErrorContext;
use relay_application::{ContextRetriever, RetrievalError};
use relay_domain::{ContextQuery, RetrievalConfig};
use tracing::debug;

pub struct KnowledgeBaseRetriever {
    client: AgentRuntimeClient,
    number_of_results: i32,
}

impl KnowledgeBaseRetriever {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &RetrievalConfig) -> Self {
        Self {
            client: AgentRuntimeClient::new(sdk_config),
            number_of_results: i32::try_from(config.number_of_results).unwrap_or(i32::MAX),
        }
    }

    fn retrieval_configuration(
        &self,
    ) -> Result<kb::KnowledgeBaseRetrievalConfiguration, RetrievalError> {
        let vector_search = kb::KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(self.number_of_results)
            .build();

        Ok(kb::KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(vector_search)
            .build())
    }
}

#[async_trait]
impl ContextRetriever for KnowledgeBaseRetriever {
    async fn retrieve(&self, query: &ContextQuery) -> Result<String, RetrievalError> {
        let retrieval_query = kb::KnowledgeBaseQuery::builder()
            .text(&query.query)
            .build();

        debug!(knowledge_base = %query.source_id, "Retrieving context");

        let output = self
            .client
            .retrieve()
            .knowledge_base_id(&query.source_id)
            .retrieval_query(retrieval_query)
            .retrieval_configuration(self.retrieval_configuration()?)
            .send()
            .await
            .map_err(|e| convert_retrieve_error(&query.source_id, &e))?;

        let context = join_passages(
            output
                .retrieval_results()
                .iter()
                .map(|result| result.content().map(|c| c.text())),
        );
        debug!(
            knowledge_base = %query.source_id,
            results = output.retrieval_results().len(),
            context_len = context.len(),
            "Context retrieved"
        );
        Ok(context)
    }
}

/// Join passage texts, newline separated, skipping empty results.
fn join_passages<'a>(texts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    texts.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

fn convert_retrieve_error(source_id: &str, err: &SdkError<RetrieveError>) -> RetrievalError {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            RetrieveError::ResourceNotFoundException(_) => {
                RetrievalError::NotFound(source_id.to_string())
            }
            other => RetrievalError::RequestFailed(format!("Knowledge base error: {}", other)),
        },
        other => RetrievalError::RequestFailed(format!(
            "Knowledge base SDK error: {}",
            DisplayErrorContext(other)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_passages() {
        let joined = join_passages([Some("Dosage is 10mg."), None, Some("Take with food.")]);
        assert_eq!(joined, "Dosage is 10mg.\nTake with food.");
    }

    #[test]
    fn test_join_passages_empty() {
        assert_eq!(join_passages(Vec::<Option<&str>>::new()), "");
    }

    #[test]
    fn test_number_of_results_saturates() {
        let sdk = aws_config::SdkConfig::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .build();
        let retriever = KnowledgeBaseRetriever::new(
            &sdk,
            &RetrievalConfig {
                number_of_results: u32::MAX,
            },
        );
        assert_eq!(retriever.number_of_results, i32::MAX);
    }
}
