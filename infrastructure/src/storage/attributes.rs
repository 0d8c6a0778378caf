//! DynamoDB item encoding

use aws_sdk_dynamodb::types::AttributeValue;
use relay_application::StoreError;
use relay_domain::{Connection, PromptTemplate};
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

pub const CONNECTION_ID: &str = "connectionId";
pub const TIMESTAMP: &str = "timestamp";

pub const SCOPE: &str = "scope";
pub const TITLE: &str = "title";
pub const PROMPT: &str = "prompt";
pub const PROMPT_TEMPLATE: &str = "prompt_template";

pub fn connection_item(connection: &Connection) -> Item {
    HashMap::from([
        (
            CONNECTION_ID.to_string(),
            AttributeValue::S(connection.id.clone()),
        ),
        (
            TIMESTAMP.to_string(),
            AttributeValue::N(connection.registered_at_millis().to_string()),
        ),
    ])
}

pub fn prompt_item(template: &PromptTemplate) -> Item {
    let mut item = HashMap::from([
        (SCOPE.to_string(), AttributeValue::S(template.scope.clone())),
        (TITLE.to_string(), AttributeValue::S(template.title.clone())),
        (PROMPT.to_string(), AttributeValue::S(template.body.clone())),
    ]);
    if let Some(ref t) = template.template {
        item.insert(PROMPT_TEMPLATE.to_string(), AttributeValue::S(t.clone()));
    }
    item
}

pub fn prompt_from_item(item: &Item) -> Result<PromptTemplate, StoreError> {
    let scope = required(item, SCOPE)?;
    let title = required(item, TITLE)?;
    let body = required(item, PROMPT)?;

    let mut template = PromptTemplate::new(scope, title, body);
    if let Some(t) = string_attr(item, PROMPT_TEMPLATE) {
        template = template.with_template(t);
    }
    Ok(template)
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Some(value.as_str()),
        _ => None,
    }
}

fn required<'a>(item: &'a Item, name: &str) -> Result<&'a str, StoreError> {
    string_attr(item, name)
        .ok_or_else(|| StoreError::Malformed(format!("prompt record has no {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_item() {
        let item = connection_item(&Connection::from_epoch_millis("L1=", Some(1_700_000_000_000)));
        assert_eq!(
            item.get(CONNECTION_ID),
            Some(&AttributeValue::S("L1=".to_string()))
        );
        assert_eq!(
            item.get(TIMESTAMP),
            Some(&AttributeValue::N("1700000000000".to_string()))
        );
    }

    #[test]
    fn test_prompt_item_omits_missing_template() {
        let item = prompt_item(&PromptTemplate::new("healthcare", "Summary", "Summarize"));
        assert_eq!(item.len(), 3);
        assert!(!item.contains_key(PROMPT_TEMPLATE));
    }

    #[test]
    fn test_prompt_from_item_with_template() {
        let template = PromptTemplate::new("healthcare", "Summary", "Summarize")
            .with_template("{context}\n{question}");
        let decoded = prompt_from_item(&prompt_item(&template)).unwrap();
        assert_eq!(decoded, template);
    }

    #[test]
    fn test_prompt_from_item_without_scope() {
        let item = HashMap::from([
            ("demo".to_string(), AttributeValue::S("claims".to_string())),
            (TITLE.to_string(), AttributeValue::S("Denials".to_string())),
            (PROMPT.to_string(), AttributeValue::S("List denials".to_string())),
        ]);
        assert!(matches!(
            prompt_from_item(&item),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_prompt_from_item_missing_body() {
        let item = HashMap::from([
            (SCOPE.to_string(), AttributeValue::S("claims".to_string())),
            (TITLE.to_string(), AttributeValue::S("Denials".to_string())),
        ]);
        assert!(matches!(
            prompt_from_item(&item),
            Err(StoreError::Malformed(_))
        ));
    }
}
