mod builder;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use little_chat_model::ErrorKind;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::text_client::{ExchangeError, ExchangePhase, TextClient};
pub use builder::ChatPanelBuilder;
pub use state::{
    BUSY_LABEL, ConversationState, IDLE_LABEL, PanelStage, PanelView,
    SubmitError,
};

type UpdateFn = Box<dyn Fn(&PanelView) + Send + Sync>;

/// A chat panel, which holds the conversation and forwards every accepted
/// submission to a text generation provider.
///
/// At most one prompt is in flight at a time. While it is, further
/// submissions are rejected with [`SubmitError::Busy`]. There is no queue,
/// no cancellation and no timeout.
///
/// Cloning the panel yields another handle to the same conversation.
#[derive(Clone)]
pub struct ChatPanel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    state: Mutex<ConversationState>,
    client: TextClient,
    on_update: Option<UpdateFn>,
}

impl PanelInner {
    #[inline]
    fn lock_state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_submit(&self, text: &str) -> Result<(), SubmitError> {
        let view = {
            let mut state = self.lock_state();
            state.begin_submit(text)?;
            state.view()
        };
        self.notify(&view);
        Ok(())
    }

    fn finish(&self, outcome: Result<String, ExchangeError>) {
        let view = {
            let mut state = self.lock_state();
            state.finish(outcome);
            state.view()
        };
        self.notify(&view);
    }

    #[inline]
    fn notify(&self, view: &PanelView) {
        if let Some(on_update) = &self.on_update {
            on_update(view);
        }
    }
}

impl ChatPanel {
    fn from_builder(builder: ChatPanelBuilder) -> Self {
        let ChatPanelBuilder { client, on_update } = builder;
        let inner = PanelInner {
            state: Mutex::new(ConversationState::new()),
            client,
            on_update,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Submits the text of the input field.
    ///
    /// On success the user message is already in the history and the panel
    /// is pending when this returns. The exchange itself runs on the Tokio
    /// runtime, so this must be called within one.
    pub fn submit(&self, text: &str) -> Result<PendingReply, SubmitError> {
        if let Err(err) = self.inner.begin_submit(text) {
            debug!("submission rejected: {err}");
            return Err(err);
        }

        let mut scope = ExchangeScope {
            inner: Arc::clone(&self.inner),
            finished: false,
        };
        let prompt = text.to_owned();
        let task = tokio::spawn(
            async move {
                let outcome = scope.inner.client.send_prompt(prompt).await;
                if let Err(err) = &outcome {
                    warn!("exchange failed: {err}");
                }
                scope.finish(outcome);
            }
            .instrument(debug_span!("panel exchange")),
        );
        Ok(PendingReply { task })
    }

    /// Takes a snapshot for the rendering layer.
    #[inline]
    pub fn view(&self) -> PanelView {
        self.inner.lock_state().view()
    }

    /// Returns `true` while a prompt is in flight.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.inner.lock_state().is_pending()
    }
}

/// Makes sure the panel leaves the pending stage even if the exchange
/// task never reaches its end, e.g. when it panics or is aborted.
struct ExchangeScope {
    inner: Arc<PanelInner>,
    finished: bool,
}

impl ExchangeScope {
    fn finish(&mut self, outcome: Result<String, ExchangeError>) {
        self.finished = true;
        self.inner.finish(outcome);
    }
}

impl Drop for ExchangeScope {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!("exchange ended without an outcome");
        let err = ExchangeError::new(
            ExchangePhase::Prompt,
            ErrorKind::Other,
            "the exchange was interrupted",
        );
        self.finish(Err(err));
    }
}

/// A handle to the exchange started by [`ChatPanel::submit`].
///
/// Dropping it does not cancel the exchange.
#[derive(Debug)]
pub struct PendingReply {
    task: JoinHandle<()>,
}

impl PendingReply {
    /// Waits until the outcome of the exchange has been recorded.
    pub async fn wait(self) {
        if let Err(err) = self.task.await {
            error!("exchange task failed: {err}");
        }
    }
}
