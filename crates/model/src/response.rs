use serde::{Deserialize, Serialize};

/// The result of prompting a [`TextSession`](crate::TextSession).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptResponse {
    /// The generated text.
    pub text: String,
}

impl PromptResponse {
    /// Creates a response carrying the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
