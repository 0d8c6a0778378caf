//! Streaming fragments produced by an inference call.
//!
//! Fragments arrive in generation order. Concatenating the `text` of every
//! fragment in receipt order reproduces the full response exactly.

/// One incremental piece of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFragment {
    pub text: String,
    /// Set on the end marker. The end marker usually carries no text.
    pub is_final: bool,
}

impl StreamFragment {
    pub fn delta(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    /// End-of-stream marker.
    pub fn end() -> Self {
        Self {
            text: String::new(),
            is_final: true,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}
