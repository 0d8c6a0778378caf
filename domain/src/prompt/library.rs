//! Saved prompt records

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A saved prompt, unique on `(scope, title)` (Entity)
///
/// Saving with an existing key overwrites; there is no versioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    #[serde(alias = "demo")]
    pub scope: String,
    pub title: String,
    #[serde(rename = "prompt")]
    pub body: String,
    #[serde(
        rename = "prompt_template",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub template: Option<String>,
}

impl PromptTemplate {
    pub fn new(
        scope: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            title: title.into(),
            body: body.into(),
            template: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("scope", &self.scope),
            ("title", &self.title),
            ("prompt", &self.body),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidPromptRecord(format!(
                    "{field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}
