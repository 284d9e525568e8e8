//! Prompt assembly for askrelay.
//!
//! This crate provides:
//! - Conversation history types and the recent-turns bound
//! - The routing prompt rendered with Handlebars
//! - The result-augmented prompt for the final streaming call

pub mod builder;
pub mod history;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::{build_final_prompt, build_prompt};
pub use history::{recent_turns, render_history, trim_history, MAX_HISTORY_TURNS};
pub use types::{
    null_as_default, BuiltPrompt, BuiltPromptMetadata, ConversationTurn, FunctionOutput,
};
