//! Storage adapters
//!
//! - [`connections::DynamoConnectionRegistry`] — attached WebSocket listeners
//! - [`prompts::DynamoPromptStore`] — saved prompt records
//! - [`documents::S3DocumentStore`] — uploaded PDFs

mod attributes;
pub mod connections;
pub mod documents;
pub mod prompts;

use aws_smithy_types::error::display::DisplayErrorContext;
use relay_application::StoreError;

/// Flatten any SDK error into a request failure with full context.
fn request_failed<E: std::error::Error>(operation: &str, err: &E) -> StoreError {
    StoreError::RequestFailed(format!("{}: {}", operation, DisplayErrorContext(err)))
}
