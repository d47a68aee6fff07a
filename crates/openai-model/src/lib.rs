//! A text generation provider for OpenAI-compatible APIs.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::future::ready;
use std::sync::Arc;

use little_chat_model::{
    ErrorKind, PromptResponse, ProviderError, TextGenerationProvider,
    TextSession,
};
use reqwest::{Client, StatusCode, header};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use proto::{ChatCompletion, ErrorBody};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible text generation provider.
///
/// Acquiring a session is purely local. Every prompt sent through a
/// session is an independent completion request carrying no history.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl TextGenerationProvider for OpenAIProvider {
    type Error = Error;
    type Session = OpenAISession;

    fn acquire_session(
        &self,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'static
    {
        trace!("acquired a session for model {}", self.config.model);
        ready(Ok(OpenAISession {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
        }))
    }
}

/// A session handle of [`OpenAIProvider`].
#[derive(Debug)]
pub struct OpenAISession {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl TextSession for OpenAISession {
    type Error = Error;

    fn prompt(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<PromptResponse, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(text, &self.config);
        let resp_fut = self
            .client
            .post(self.config.completions_url())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::ACCEPT, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or_else(|_| format!("server returned {status}"));
                return Err(Error::new(message, error_kind_for_status(status)));
            }

            let completion: ChatCompletion = resp
                .json()
                .await
                .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
            let Some(text) = completion.into_text() else {
                return Err(Error::new("no choices returned", ErrorKind::Other));
            };
            Ok(PromptResponse { text })
        }
    }

    fn release(self) {
        trace!("released a session");
    }
}

fn error_kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND
        | StatusCode::SERVICE_UNAVAILABLE => ErrorKind::Unavailable,
        s if s.is_client_error() => ErrorKind::Rejected,
        _ => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_for_status() {
        assert_eq!(
            error_kind_for_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorKind::RateLimitExceeded
        );
        assert_eq!(
            error_kind_for_status(StatusCode::UNAUTHORIZED),
            ErrorKind::Unavailable
        );
        assert_eq!(
            error_kind_for_status(StatusCode::BAD_REQUEST),
            ErrorKind::Rejected
        );
        assert_eq!(
            error_kind_for_status(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorKind::Other
        );
    }

    #[tokio::test]
    async fn test_acquire_is_local() {
        let provider = OpenAIProvider::new(
            OpenAIConfigBuilder::with_api_key("sk-test")
                .with_base_url("http://127.0.0.1:9")
                .build(),
        );
        let session = provider.acquire_session().await.unwrap();
        session.release();
    }
}
