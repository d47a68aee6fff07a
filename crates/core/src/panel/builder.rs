use little_chat_model::TextGenerationProvider;

use super::{ChatPanel, PanelView, UpdateFn};
use crate::text_client::TextClient;

/// [`ChatPanel`] builder.
pub struct ChatPanelBuilder {
    pub(crate) client: TextClient,
    pub(crate) on_update: Option<UpdateFn>,
}

impl ChatPanelBuilder {
    /// Creates a new builder with the specified provider.
    #[inline]
    pub fn with_provider<P: TextGenerationProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            client: TextClient::new(provider),
            on_update: None,
        }
    }

    /// Attaches a callback to be invoked after every state transition.
    ///
    /// The callback runs on whichever task caused the transition, after the
    /// state lock has been released.
    #[inline]
    pub fn on_update(
        mut self,
        on_update: impl Fn(&PanelView) + Send + Sync + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(on_update));
        self
    }

    /// Builds the panel.
    #[inline]
    pub fn build(self) -> ChatPanel {
        ChatPanel::from_builder(self)
    }
}
