//! Conversation history bounds.

use crate::types::ConversationTurn;

/// Most recent turns kept from the caller's history.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Keep only the last [`MAX_HISTORY_TURNS`] turns, preserving order.
pub fn trim_history(mut history: Vec<ConversationTurn>) -> Vec<ConversationTurn> {
    if history.len() > MAX_HISTORY_TURNS {
        let excess = history.len() - MAX_HISTORY_TURNS;
        history.drain(..excess);
    }
    history
}

/// Borrowing variant of [`trim_history`].
pub fn recent_turns(history: &[ConversationTurn]) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    &history[start..]
}

/// Render turns as a `Previous conversation context:` block, or nothing.
pub fn render_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let mut context = String::from("\n\nPrevious conversation context:\n");
    for turn in history {
        context.push_str(&turn.role);
        context.push_str(": ");
        context.push_str(&turn.message);
        context.push('\n');
    }
    context.push('\n');
    context
}
