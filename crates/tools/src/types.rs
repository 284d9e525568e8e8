//! Tool names, invocations and results.

use askrelay_core::{AppError, AppResult};
use askrelay_llm::ToolCall;
use serde::{Deserialize, Serialize};

/// The auxiliary tools the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolName {
    /// Web search for general and current-events questions
    #[serde(rename = "get_general_response")]
    GeneralResponse,
    /// quran.com-scoped search for Islamic knowledge questions
    #[serde(rename = "get_quran_response")]
    QuranResponse,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::GeneralResponse, ToolName::QuranResponse];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "get_general_response" => Some(Self::GeneralResponse),
            "get_quran_response" => Some(Self::QuranResponse),
            _ => None,
        }
    }

    /// Function name as declared to the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralResponse => "get_general_response",
            Self::QuranResponse => "get_quran_response",
        }
    }

    /// Fragment streamed to the caller right before the tool runs.
    pub fn progress_marker(&self) -> &'static str {
        match self {
            Self::GeneralResponse => "🔍 Searching for current information...\n\n",
            Self::QuranResponse => "📖 Searching for Islamic guidance from Quran...\n\n",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to run one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: ToolName,
    pub query: String,
}

impl ToolInvocation {
    /// Validate a model-issued call.
    ///
    /// Returns `Ok(None)` for functions that were never declared, and an
    /// error when a known function is missing its `query` argument.
    pub fn from_call(call: &ToolCall) -> AppResult<Option<Self>> {
        let Some(tool) = ToolName::parse(&call.name) else {
            return Ok(None);
        };

        let query = call.argument("query").ok_or_else(|| {
            AppError::Tool(format!("{} called without a 'query' argument", tool))
        })?;

        Ok(Some(Self {
            tool,
            query: query.to_string(),
        }))
    }
}

/// Outcome of one tool run. Failures are data, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The query exactly as the model supplied it
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_enhanced: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ToolResult {
    pub fn success(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            error: None,
            query: query.into(),
            search_enhanced: Some(true),
            search_source: None,
            content_type: None,
            note: None,
        }
    }

    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
            query: query.into(),
            search_enhanced: None,
            search_source: None,
            content_type: None,
            note: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.search_source = Some(source.into());
        self
    }

    /// Pretty JSON rendering used in the final prompt.
    pub fn to_prompt_text(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
