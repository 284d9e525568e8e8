//! Prompt types for askrelay.

use serde::{Deserialize, Deserializer, Serialize};

fn unknown_role() -> String {
    "UNKNOWN".to_string()
}

fn role_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_role))
}

/// Deserialize `null` as the type's default instead of failing.
///
/// Pair with `#[serde(default)]` so a missing field behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One turn of the caller-supplied conversation, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Speaker label, rendered verbatim (e.g. "user", "assistant")
    #[serde(default = "unknown_role", deserialize_with = "role_or_unknown")]
    pub role: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            message: message.into(),
        }
    }
}

/// Output of one tool, already serialized, to fold into the final prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionOutput {
    pub name: String,
    pub output: String,
}

/// A fully built prompt ready for the decision call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    pub text: String,

    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Civil timestamp embedded in the prompt
    #[serde(rename = "generatedAt")]
    pub generated_at: String,

    /// History turns rendered into the prompt
    #[serde(rename = "historyTurns")]
    pub history_turns: usize,

    /// Older turns left out by the history bound
    #[serde(rename = "historyDropped")]
    pub history_dropped: usize,
}
