//! A terminal chat panel that forwards prompts to a text generation
//! provider and renders the conversation.
//!
//! The crate includes a CLI tool for chatting in the terminal. The
//! renderer is also usable on its own for drawing a [`PanelView`].

#![deny(missing_docs)]

pub mod render;

pub use little_chat_core::{ChatPanel, ChatPanelBuilder, PanelView};

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}
