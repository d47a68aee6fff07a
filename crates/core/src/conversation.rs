//! Conversation-related types.

use std::fmt::{self, Display, Formatter};

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person typing into the panel.
    User,
    /// The text generation provider.
    Bot,
}

impl Sender {
    /// Returns the label shown above the message.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl Display for Sender {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One turn in the conversation.
///
/// Messages are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    sender: Sender,
    content: String,
}

impl Message {
    #[inline]
    pub(crate) fn new(sender: Sender, content: String) -> Self {
        Self { sender, content }
    }

    /// Returns the author of this message.
    #[inline]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the text of this message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// An append-only, insertion-ordered list of messages.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    items: Vec<Message>,
}

impl Conversation {
    /// Returns all messages in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.items
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub(crate) fn push(&mut self, sender: Sender, content: String) {
        self.items.push(Message::new(sender, content));
    }
}
