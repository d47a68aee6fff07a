//! A local scripted text generation provider for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use little_chat_model::{
    ErrorKind, PromptResponse, ProviderError, TextGenerationProvider,
    TextSession,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Counters of the calls made against a [`ScriptedProvider`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub acquired: usize,
    pub prompted: usize,
    pub released: usize,
}

#[derive(Default)]
struct Shared {
    replies: Mutex<VecDeque<PresetReply>>,
    acquire_failures: AtomicUsize,
    acquired: AtomicUsize,
    prompted: AtomicUsize,
    released: AtomicUsize,
}

impl Shared {
    fn next_reply(&self) -> Option<PresetReply> {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }
}

/// A local scripted provider for testing purpose.
///
/// Before prompting, you need to setup the script, which is how the
/// provider should answer. Every prompt consumes the next reply, no matter
/// which session it was sent through. If there are no replies left, an
/// error will be returned.
///
/// Clones share the same script and counters, so a test can keep one
/// clone around to inspect [`stats`](Self::stats) after handing the other
/// to the code under test.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    shared: Arc<Shared>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    #[inline]
    pub fn add_reply(&mut self, reply: PresetReply) {
        self.shared
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }

    /// Makes the next `count` acquisitions fail.
    #[inline]
    pub fn fail_next_acquisitions(&mut self, count: usize) {
        self.shared.acquire_failures.store(count, Ordering::SeqCst);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            acquired: self.shared.acquired.load(Ordering::SeqCst),
            prompted: self.shared.prompted.load(Ordering::SeqCst),
            released: self.shared.released.load(Ordering::SeqCst),
        }
    }
}

impl TextGenerationProvider for ScriptedProvider {
    type Error = crate::Error;
    type Session = ScriptedSession;

    fn acquire_session(
        &self,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'static
    {
        let should_fail = self
            .shared
            .acquire_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok();
        let result = if should_fail {
            Err(Error {
                message: "session is not available",
                kind: ErrorKind::Unavailable,
            })
        } else {
            self.shared.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(ScriptedSession {
                shared: Arc::clone(&self.shared),
                delay: self.delay.unwrap_or(Duration::from_millis(1)),
            })
        };
        ready(result)
    }
}

pub struct ScriptedSession {
    shared: Arc<Shared>,
    delay: Duration,
}

impl TextSession for ScriptedSession {
    type Error = crate::Error;

    fn prompt(
        &mut self,
        _text: &str,
    ) -> impl Future<Output = Result<PromptResponse, Self::Error>> + Send + 'static
    {
        self.shared.prompted.fetch_add(1, Ordering::SeqCst);
        let reply = self.shared.next_reply();
        let delay = self.delay;

        async move {
            sleep(delay).await;
            let Some(reply) = reply else {
                return Err(Error {
                    message: "no enough replies",
                    kind: ErrorKind::Other,
                });
            };
            match reply.failure {
                Some(failure) => Err(Error {
                    message: "preset failure",
                    kind: failure.kind(),
                }),
                None => Ok(PromptResponse::new(reply.text)),
            }
        }
    }

    fn release(self) {
        self.shared.released.fetch_add(1, Ordering::SeqCst);
    }
}
