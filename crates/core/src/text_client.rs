use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::pin::Pin;
use std::sync::Arc;

use little_chat_model::{
    ErrorKind, ProviderError, TextGenerationProvider, TextSession,
};
use tracing::Instrument;

type SendPromptResult = Result<String, ExchangeError>;
type BoxedSendPromptFuture =
    Pin<Box<dyn Future<Output = SendPromptResult> + Send>>;
type HandlerFn = Arc<dyn Fn(String) -> BoxedSendPromptFuture + Send + Sync>;

/// The step of an exchange that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangePhase {
    /// No session could be obtained.
    Acquire,
    /// The session did not answer the prompt.
    Prompt,
}

/// An exchange with the provider that did not produce a response.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExchangeError {
    phase: ExchangePhase,
    kind: ErrorKind,
    message: String,
}

impl ExchangeError {
    /// Creates an error for the given phase.
    #[inline]
    pub fn new(
        phase: ExchangePhase,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            kind,
            message: message.into(),
        }
    }

    fn from_provider<E: ProviderError>(phase: ExchangePhase, err: &E) -> Self {
        Self::new(phase, err.kind(), err.to_string())
    }

    /// Returns the step that failed.
    #[inline]
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    /// Returns the kind reported by the provider.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the provider's error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.phase {
            ExchangePhase::Acquire => {
                write!(f, "could not start a session: {}", self.message)
            }
            ExchangePhase::Prompt => {
                write!(f, "prompt failed ({}): {}", self.kind, self.message)
            }
        }
    }
}

impl Error for ExchangeError {}

/// A wrapper around a text generation provider that runs one complete
/// exchange per prompt and provides a type-erased interface for the
/// other modules.
///
/// Every exchange acquires a fresh session, sends exactly one prompt and
/// releases the session. The session is released on every exit path,
/// including failures and the returned future being dropped.
#[derive(Clone)]
pub struct TextClient {
    handler_fn: HandlerFn,
}

impl TextClient {
    /// Wraps a provider.
    #[inline]
    pub fn new<P: TextGenerationProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `TextClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |prompt| {
            let acquire_fut = provider.acquire_session();
            Box::pin(
                async move {
                    trace!("got a prompt: {prompt:?}");
                    let session = match acquire_fut.await {
                        Ok(session) => session,
                        Err(err) => {
                            error!("failed to acquire a session: {err:?}");
                            return Err(ExchangeError::from_provider(
                                ExchangePhase::Acquire,
                                &err,
                            ));
                        }
                    };
                    run_exchange(session, prompt).await
                }
                .instrument(trace_span!("text client exchange")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a prompt through a freshly acquired session and returns the
    /// response text.
    #[inline]
    pub async fn send_prompt(&self, prompt: String) -> SendPromptResult {
        (self.handler_fn)(prompt).await
    }
}

async fn run_exchange<S: TextSession>(
    session: S,
    prompt: String,
) -> SendPromptResult {
    let mut guard = SessionGuard::new(session);

    let resp = match guard.session_mut().prompt(&prompt).await {
        Ok(resp) => resp,
        Err(err) => {
            error!("got an error: {err:?}");
            return Err(ExchangeError::from_provider(
                ExchangePhase::Prompt,
                &err,
            ));
        }
    };

    trace!("got a response of {} bytes", resp.text.len());
    guard.release();
    Ok(resp.text)
}

/// Holds a session and releases it when dropped, unless it was released
/// explicitly before.
struct SessionGuard<S: TextSession> {
    session: Option<S>,
}

impl<S: TextSession> SessionGuard<S> {
    #[inline]
    fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    #[inline]
    fn session_mut(&mut self) -> &mut S {
        self.session
            .as_mut()
            .expect("session is only taken out on release")
    }

    #[inline]
    fn release(mut self) {
        if let Some(session) = self.session.take() {
            session.release();
            trace!("released the session");
        }
    }
}

impl<S: TextSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("releasing the session on an early exit");
            session.release();
        }
    }
}
