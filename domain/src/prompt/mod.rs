//! Prompt construction and saved prompt records.

pub mod library;
pub mod request;
pub mod template;

pub use library::PromptTemplate;
pub use request::{ContextQuery, PromptRequest};
pub use template::PromptBuilder;
