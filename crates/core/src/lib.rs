//! Core logic of the chat panel: conversation history, the submission
//! state machine, and the scoped exchange with a text generation provider.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod conversation;
mod panel;
mod text_client;

pub use panel::{
    BUSY_LABEL, ChatPanel, ChatPanelBuilder, ConversationState, IDLE_LABEL,
    PanelStage, PanelView, PendingReply, SubmitError,
};
pub use text_client::{ExchangeError, ExchangePhase, TextClient};
