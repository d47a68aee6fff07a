use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use little_chat_model::{
    ErrorKind, PromptResponse, ProviderError, TextGenerationProvider,
    TextSession,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeProviderError(ErrorKind);

impl Display for FakeProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeProviderError {}

impl ProviderError for FakeProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

struct EchoSession {
    released: Arc<AtomicUsize>,
}

impl TextSession for EchoSession {
    type Error = FakeProviderError;

    fn prompt(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<PromptResponse, Self::Error>> + Send + 'static
    {
        let result = if text.is_empty() {
            Err(FakeProviderError(ErrorKind::Rejected))
        } else {
            Ok(PromptResponse::new(format!("You said {text}")))
        };
        async move {
            sleep(Duration::from_millis(1)).await;
            result
        }
    }

    fn release(self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct EchoProvider {
    available: bool,
    released: Arc<AtomicUsize>,
}

impl TextGenerationProvider for EchoProvider {
    type Error = FakeProviderError;
    type Session = EchoSession;

    fn acquire_session(
        &self,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'static
    {
        let result = if self.available {
            Ok(EchoSession {
                released: Arc::clone(&self.released),
            })
        } else {
            Err(FakeProviderError(ErrorKind::Unavailable))
        };
        ready(result)
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompt_and_release() {
        let provider = EchoProvider {
            available: true,
            ..Default::default()
        };
        let mut session = provider.acquire_session().await.unwrap();
        let resp = session.prompt("Good morning").await.unwrap();
        assert_eq!(resp.text, "You said Good morning");

        session.release();
        assert_eq!(provider.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prompt_error() {
        let provider = EchoProvider {
            available: true,
            ..Default::default()
        };
        let mut session = provider.acquire_session().await.unwrap();
        let err = session.prompt("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[tokio::test]
    async fn test_acquire_error() {
        let provider = EchoProvider::default();
        let err = provider.acquire_session().await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_response_wire_shape() {
        let resp: PromptResponse =
            serde_json::from_str(r#"{"text":"hi there"}"#).unwrap();
        assert_eq!(resp, PromptResponse::new("hi there"));
    }
}
