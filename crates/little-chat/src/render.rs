//! Plain-text rendering of the chat panel.
//!
//! Every message is drawn as its sender label followed by a speech
//! bubble. User messages hug the left edge and bot messages the right
//! edge. The corner next to the label is squared off, like the tail of a
//! speech bubble.

use std::borrow::Cow;

use little_chat_core::PanelView;
use little_chat_core::conversation::{Message, Sender};
use unicode_width::UnicodeWidthStr;

/// Share of the panel width a bubble may take, in percent.
const MAX_BUBBLE_PERCENT: usize = 45;
const MIN_BUBBLE_WIDTH: usize = 8;

/// Renders the whole panel: the history, a failure notice if the last
/// exchange failed, and the input line.
pub fn render_panel(view: &PanelView, width: usize) -> String {
    let mut lines = Vec::new();
    for msg in &view.messages {
        lines.extend(render_message(msg, width));
    }
    if let Some(line) = render_failure(view) {
        lines.push(line);
    }
    lines.push(render_input_line(view));
    lines.join("\n")
}

/// Renders one message as a label line followed by the bubble lines.
pub fn render_message(msg: &Message, width: usize) -> Vec<String> {
    let inner_width = bubble_inner_width(width);
    let body = wrap(msg.content(), inner_width);
    let text_width = body
        .iter()
        .map(|line| line.width())
        .max()
        .unwrap_or(0);

    let horizontal = "─".repeat(text_width + 2);
    let (top, bottom) = match msg.sender() {
        Sender::User => (format!("┌{horizontal}╮"), format!("╰{horizontal}╯")),
        Sender::Bot => (format!("╭{horizontal}┐"), format!("╰{horizontal}╯")),
    };

    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(msg.sender().label().to_owned());
    lines.push(top);
    for line in &body {
        let pad = text_width - line.width();
        lines.push(format!("│ {line}{} │", " ".repeat(pad)));
    }
    lines.push(bottom);

    if msg.sender() == Sender::Bot {
        for line in &mut lines {
            let indent = width.saturating_sub(line.width());
            line.insert_str(0, &" ".repeat(indent));
        }
    }
    lines
}

/// Renders the notice for a failed exchange, if any.
pub fn render_failure(view: &PanelView) -> Option<String> {
    view.failure.as_ref().map(|err| format!("! {err}"))
}

/// Renders the input line with the submit control's label.
pub fn render_input_line(view: &PanelView) -> String {
    if view.input_enabled() {
        format!("> [{}]", view.submit_label())
    } else {
        format!("  [{}]", view.submit_label())
    }
}

fn bubble_inner_width(width: usize) -> usize {
    // Two columns of border and two of padding.
    (width * MAX_BUBBLE_PERCENT / 100)
        .saturating_sub(4)
        .max(MIN_BUBBLE_WIDTH)
}

fn wrap(text: &str, width: usize) -> Vec<Cow<'_, str>> {
    let lines = textwrap::wrap(text, width);
    if lines.is_empty() {
        vec![Cow::Borrowed("")]
    } else {
        lines
    }
}
