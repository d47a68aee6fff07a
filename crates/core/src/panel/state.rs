use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::conversation::{Conversation, Message, Sender};
use crate::text_client::ExchangeError;

/// Label of the submit control while the panel accepts input.
pub const IDLE_LABEL: &str = "send";

/// Label of the submit control while a prompt is in flight.
pub const BUSY_LABEL: &str = "sending...";

/// The stage the panel is in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PanelStage {
    /// Ready for a new submission.
    #[default]
    Idle,
    /// A prompt has been sent and no outcome is known yet.
    AwaitingResponse,
    /// The last exchange failed. Submission is allowed again.
    Failed(ExchangeError),
}

/// Why a submission was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitError {
    /// The text is empty or only whitespace.
    Empty,
    /// Another prompt is still in flight.
    Busy,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Empty => f.write_str("nothing to send"),
            SubmitError::Busy => f.write_str("a prompt is already in flight"),
        }
    }
}

impl Error for SubmitError {}

/// The conversation history together with the submission state machine.
///
/// There are only two transitions: [`begin_submit`](Self::begin_submit)
/// moves the panel into [`PanelStage::AwaitingResponse`], and
/// [`finish`](Self::finish) moves it out again with either a bot message
/// or a recorded failure.
#[derive(Clone, Default, Debug)]
pub struct ConversationState {
    conversation: Conversation,
    stage: PanelStage,
}

impl ConversationState {
    /// Creates an empty, idle state.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a submission, appending it as a user message.
    ///
    /// Blank text is rejected without touching the state, and so is any
    /// text while a prompt is in flight.
    pub fn begin_submit(&mut self, text: &str) -> Result<(), SubmitError> {
        if self.is_pending() {
            return Err(SubmitError::Busy);
        }
        if text.trim().is_empty() {
            return Err(SubmitError::Empty);
        }

        self.conversation.push(Sender::User, text.to_owned());
        self.stage = PanelStage::AwaitingResponse;
        Ok(())
    }

    /// Records the outcome of the in-flight exchange.
    pub fn finish(&mut self, outcome: Result<String, ExchangeError>) {
        if !self.is_pending() {
            warn!("got an outcome while no prompt is in flight, ignored");
            return;
        }

        self.stage = match outcome {
            Ok(text) => {
                self.conversation.push(Sender::Bot, text);
                PanelStage::Idle
            }
            Err(err) => PanelStage::Failed(err),
        };
    }

    /// Returns `true` while a prompt is in flight.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.stage == PanelStage::AwaitingResponse
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> &PanelStage {
        &self.stage
    }

    /// Returns the history in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// Returns the failure of the last exchange, if it failed.
    #[inline]
    pub fn failure(&self) -> Option<&ExchangeError> {
        match &self.stage {
            PanelStage::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Takes a snapshot for the rendering layer.
    pub fn view(&self) -> PanelView {
        PanelView {
            messages: self.messages().to_vec(),
            pending: self.is_pending(),
            failure: self.failure().cloned(),
        }
    }
}

/// A read-only snapshot of the panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelView {
    /// All messages in insertion order.
    pub messages: Vec<Message>,
    /// Whether a prompt is in flight.
    pub pending: bool,
    /// The failure of the last exchange, if it failed.
    pub failure: Option<ExchangeError>,
}

impl PanelView {
    /// Returns the label of the submit control.
    #[inline]
    pub fn submit_label(&self) -> &'static str {
        if self.pending { BUSY_LABEL } else { IDLE_LABEL }
    }

    /// Returns whether the input and submit control are enabled.
    #[inline]
    pub fn input_enabled(&self) -> bool {
        !self.pending
    }
}

#[cfg(test)]
mod tests {
    use little_chat_model::ErrorKind;

    use super::*;
    use crate::text_client::ExchangePhase;

    fn snapshot(state: &ConversationState) -> Vec<(Sender, String)> {
        state
            .messages()
            .iter()
            .map(|m| (m.sender(), m.content().to_owned()))
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let mut state = ConversationState::new();
        assert_eq!(state.view().submit_label(), IDLE_LABEL);

        state.begin_submit("hello").unwrap();
        assert!(state.is_pending());
        let view = state.view();
        assert!(!view.input_enabled());
        assert_eq!(view.submit_label(), BUSY_LABEL);

        state.finish(Ok("hi there".to_owned()));
        assert!(!state.is_pending());
        assert_eq!(
            snapshot(&state),
            [
                (Sender::User, "hello".to_owned()),
                (Sender::Bot, "hi there".to_owned()),
            ]
        );
        assert!(state.view().input_enabled());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut state = ConversationState::new();
        for text in ["", " ", "\t\n  "] {
            assert_eq!(state.begin_submit(text), Err(SubmitError::Empty));
        }
        assert!(state.messages().is_empty());
        assert!(!state.is_pending());
    }

    #[test]
    fn test_content_is_kept_verbatim() {
        let mut state = ConversationState::new();
        state.begin_submit("  spaced out ").unwrap();
        assert_eq!(state.messages()[0].content(), "  spaced out ");
    }

    #[test]
    fn test_busy_rejects_submission() {
        let mut state = ConversationState::new();
        state.begin_submit("first").unwrap();
        assert_eq!(state.begin_submit("second"), Err(SubmitError::Busy));
        assert_eq!(snapshot(&state), [(Sender::User, "first".to_owned())]);
    }

    #[test]
    fn test_failure_clears_pending() {
        let mut state = ConversationState::new();
        state.begin_submit("hello").unwrap();
        let err =
            ExchangeError::new(ExchangePhase::Prompt, ErrorKind::Rejected, "no");
        state.finish(Err(err.clone()));

        assert!(!state.is_pending());
        assert_eq!(state.failure(), Some(&err));
        assert_eq!(state.stage(), &PanelStage::Failed(err));
        assert_eq!(state.messages().len(), 1);

        // A new submission leaves the failed stage behind.
        state.begin_submit("again").unwrap();
        assert_eq!(state.failure(), None);
        assert!(state.is_pending());
    }

    #[test]
    fn test_stray_outcome_is_ignored() {
        let mut state = ConversationState::new();
        state.finish(Ok("unsolicited".to_owned()));
        assert!(state.messages().is_empty());
        assert_eq!(state.stage(), &PanelStage::Idle);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut state = ConversationState::new();
        let mut seen = Vec::new();
        let outcomes = [
            Ok("a".to_owned()),
            Err(ExchangeError::new(
                ExchangePhase::Acquire,
                ErrorKind::Unavailable,
                "gone",
            )),
            Ok("c".to_owned()),
        ];
        for (i, outcome) in outcomes.into_iter().enumerate() {
            state.begin_submit(&format!("q{i}")).unwrap();
            state.finish(outcome);

            let now = snapshot(&state);
            assert_eq!(&now[..seen.len()], &seen[..]);
            seen = now;
        }
        assert_eq!(seen.len(), 5);
    }
}
