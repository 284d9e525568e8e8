//! LLM client abstraction and request/response types.
//!
//! The relay only ever talks to a model through [`LlmClient`], so the real
//! provider and the scripted test double are interchangeable.

use askrelay_core::AppResult;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::types::{ToolCall, ToolDeclaration};

/// LLM generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The prompt text to send to the LLM
    pub prompt: String,

    /// Model identifier (e.g., "gemini-2.0-flash-exp")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Enable streaming responses
    #[serde(default)]
    pub stream: bool,

    /// Functions the model may ask to call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclaration>,

    /// Ground the answer with the provider's built-in web search
    #[serde(default)]
    pub web_search: bool,
}

impl LlmRequest {
    /// Create a new LLM request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
            stream: false,
            tools: Vec::new(),
            web_search: false,
        }
    }

    /// Enable streaming for this request.
    pub fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Declare callable tools.
    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    /// Enable search grounding.
    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// LLM generation response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Tool invocations requested by the model, in the order returned
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,

    /// Usage statistics
    #[serde(default)]
    pub usage: LlmUsage,
}

impl LlmResponse {
    /// Plain-text response.
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Response that only requests tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            tool_calls: calls,
            ..Self::default()
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A chunk from a streaming LLM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmStreamChunk {
    /// Incremental text content
    pub content: String,

    /// Model generating the stream
    pub model: String,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,

    /// Usage statistics (only in final chunk)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
}

impl LlmStreamChunk {
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            done: false,
            usage: None,
        }
    }
}

/// Stream of LLM chunks.
///
/// An item may fail without ending the stream when a single chunk cannot be
/// decoded. `AppError::Stream` means the connection itself failed and is
/// always the last item.
pub type LlmStream = Pin<Box<dyn Stream<Item = AppResult<LlmStreamChunk>> + Send>>;

/// Trait for LLM providers.
///
/// `complete` is the one-shot "generate" operation (text or tool calls);
/// `stream` is its token-streaming variant.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "gemini", "mock").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming generation.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;

    /// Perform a streaming generation.
    ///
    /// The returned stream is lazy, finite and cannot be restarted.
    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream>;
}
