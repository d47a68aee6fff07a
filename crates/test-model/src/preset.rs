use little_chat_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// How a preset reply should fail instead of answering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresetFailure {
    /// The prompt is refused by the provider.
    Rejected,
    /// The provider reports a rate limit.
    RateLimited,
}

impl PresetFailure {
    #[inline]
    pub(crate) fn kind(self) -> ErrorKind {
        match self {
            PresetFailure::Rejected => ErrorKind::Rejected,
            PresetFailure::RateLimited => ErrorKind::RateLimitExceeded,
        }
    }
}

/// The preset reply for one prompt.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// Text returned when the prompt succeeds.
    pub text: String,
    /// If set, the prompt fails with this failure instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<PresetFailure>,
}

impl PresetReply {
    /// Creates a successful `PresetReply` with the specified text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            failure: None,
        }
    }

    /// Creates a `PresetReply` that always fails.
    #[inline]
    pub fn failing(failure: PresetFailure) -> Self {
        Self {
            text: String::new(),
            failure: Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_script() {
        let script: Vec<PresetReply> = serde_json::from_str(
            r#"[
                { "text": "hi there" },
                { "text": "", "failure": { "type": "rate_limited" } }
            ]"#,
        )
        .unwrap();

        assert_eq!(
            script,
            vec![
                PresetReply::with_text("hi there"),
                PresetReply::failing(PresetFailure::RateLimited),
            ]
        );
        assert_eq!(
            script[1].failure.map(PresetFailure::kind),
            Some(ErrorKind::RateLimitExceeded)
        );
    }

    #[test]
    fn test_skip_empty_failure() {
        let serialized =
            serde_json::to_string(&PresetReply::with_text("ok")).unwrap();
        assert_eq!(serialized, r#"{"text":"ok"}"#);
    }
}
