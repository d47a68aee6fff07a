use std::error::Error;

use crate::error::ErrorKind;
use crate::response::PromptResponse;

/// The error type for a text generation provider.
pub trait ProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a text generation capability supplied by the
/// host environment.
///
/// The provider itself holds no conversation. Callers acquire a
/// [`TextSession`] for every exchange, and the provider should be prepared
/// for being dropped anytime.
pub trait TextGenerationProvider: Send + Sync {
    /// The error type that may be returned by the provider and its
    /// sessions.
    type Error: ProviderError;

    /// The session handle type for this provider.
    type Session: TextSession<Error = Self::Error>;

    /// Obtains a new session handle.
    fn acquire_session(
        &self,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'static;
}

/// A short-lived handle to the text generation capability.
///
/// A session is scoped to one prompt/response exchange. Once
/// [`release`](TextSession::release) is called the handle is consumed, so
/// it can neither be prompted nor released again.
pub trait TextSession: Send + 'static {
    /// The error type that may be returned by the session.
    type Error: ProviderError;

    /// Sends one prompt and resolves with one textual result.
    ///
    /// The returned future must not borrow the session. Implementations
    /// should clone whatever state they need before returning it.
    fn prompt(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<PromptResponse, Self::Error>> + Send + 'static;

    /// Relinquishes the session.
    fn release(self);
}
