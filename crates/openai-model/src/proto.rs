use serde::{Deserialize, Serialize};

use crate::OpenAIConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

// -----------
// Conversions
// -----------

pub fn create_request(
    prompt: &str,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = &config.system_prompt {
        messages.push(Message::System {
            content: system_prompt.clone(),
        });
    }
    messages.push(Message::User {
        content: prompt.to_owned(),
    });
    ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        stream: false,
    }
}

impl ChatCompletion {
    /// Takes the text of the first choice, if any.
    pub fn into_text(self) -> Option<String> {
        let choice = self.choices.into_iter().next()?;
        Some(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let config = OpenAIConfigBuilder::with_api_key("sk-test")
            .with_model("small")
            .with_system_prompt("Be brief.")
            .build();
        let req = create_request("hello", &config);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "small",
                "messages": [
                    { "role": "system", "content": "Be brief." },
                    { "role": "user", "content": "hello" }
                ],
                "stream": false
            })
        );
    }

    #[test]
    fn test_parse_completion() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "hi there" },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();
        assert_eq!(completion.into_text().as_deref(), Some("hi there"));
    }

    #[test]
    fn test_parse_empty_choices() {
        let completion: ChatCompletion =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert_eq!(completion.into_text(), None);
    }
}
