//! Scripted mock provider.
//!
//! Replays queued responses in order and records every request it sees.
//! With nothing queued it answers with a fixed reply, which makes
//! `provider: mock` usable for running the server offline.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk};
use crate::types::ToolCall;
use askrelay_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

const DEFAULT_REPLY: &str = "This is a mock response.";

#[derive(Default)]
struct Script {
    completions: VecDeque<AppResult<LlmResponse>>,
    streams: VecDeque<AppResult<Vec<AppResult<LlmStreamChunk>>>>,
    requests: Vec<LlmRequest>,
}

/// Mock client for tests and offline development.
pub struct MockClient {
    default_reply: String,
    script: Mutex<Script>,
}

impl std::fmt::Debug for MockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClient")
            .field("default_reply", &self.default_reply)
            .finish_non_exhaustive()
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self::with_default_reply(DEFAULT_REPLY)
    }

    pub fn with_default_reply(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            script: Mutex::new(Script::default()),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue the outcome of the next `complete` call.
    pub fn push_completion(&self, outcome: AppResult<LlmResponse>) {
        self.script().completions.push_back(outcome);
    }

    /// Queue a plain-text completion.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_completion(Ok(LlmResponse::text(text, "mock")));
    }

    /// Queue a completion that requests tool calls.
    pub fn push_tool_calls(&self, calls: Vec<ToolCall>) {
        self.push_completion(Ok(LlmResponse::tool_calls(calls, "mock")));
    }

    /// Queue a failing completion.
    pub fn push_error(&self, message: impl Into<String>) {
        self.push_completion(Err(AppError::Llm(message.into())));
    }

    /// Queue the items of the next `stream` call.
    pub fn push_stream(&self, items: Vec<AppResult<LlmStreamChunk>>) {
        self.script().streams.push_back(Ok(items));
    }

    /// Queue a stream made of text fragments.
    pub fn push_stream_text(&self, fragments: &[&str]) {
        self.push_stream(
            fragments
                .iter()
                .map(|f| Ok(LlmStreamChunk::text(*f, "mock")))
                .collect(),
        );
    }

    /// Queue a `stream` call that fails before yielding anything.
    pub fn push_stream_error(&self, message: impl Into<String>) {
        self.script()
            .streams
            .push_back(Err(AppError::Llm(message.into())));
    }

    /// Every request received so far, in order, across both methods.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.script().requests.clone()
    }

    pub fn complete_calls(&self) -> usize {
        self.script().requests.iter().filter(|r| !r.stream).count()
    }

    pub fn stream_calls(&self) -> usize {
        self.script().requests.iter().filter(|r| r.stream).count()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let mut script = self.script();
        let mut recorded = request.clone();
        recorded.stream = false;
        script.requests.push(recorded);

        script
            .completions
            .pop_front()
            .unwrap_or_else(|| Ok(LlmResponse::text(self.default_reply.clone(), "mock")))
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        let mut script = self.script();
        let mut recorded = request.clone();
        recorded.stream = true;
        script.requests.push(recorded);

        let items = match script.streams.pop_front() {
            Some(scripted) => scripted?,
            None => vec![Ok(LlmStreamChunk::text(self.default_reply.clone(), "mock"))],
        };

        Ok(Box::pin(futures::stream::iter(items)))
    }
}
