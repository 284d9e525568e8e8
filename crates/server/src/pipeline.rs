//! Two-phase answer pipeline.
//!
//! A decision call lets the model either answer directly or request tools.
//! Requested tools run in order, their results are folded into a second
//! prompt, and that prompt is streamed back fragment by fragment.

use askrelay_core::{AppConfig, AppError, AppResult, CivilClock};
use askrelay_llm::{create_client, LlmClient, LlmRequest, LlmResponse, ToolCall};
use askrelay_prompt::{build_final_prompt, build_prompt, ConversationTurn, FunctionOutput};
use askrelay_tools::{function_declarations, SearchTools, ToolInvocation};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;

pub const RELAY_TEMPERATURE: f32 = 0.3;
pub const RELAY_MAX_TOKENS: u32 = 8000;

pub const PROCESSING_MARKER: &str = "💭 Processing information and generating response...\n\n";
pub const COMPLETION_MARKER: &str = "\n\n✨ [Response Complete]";

/// Ordered, finite stream of answer fragments.
pub type AnswerStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// What the model chose to do with the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Answer text, used as-is
    Direct(String),
    /// Tool calls, in the order the model returned them
    UseTools(Vec<ToolCall>),
}

impl From<LlmResponse> for Decision {
    fn from(response: LlmResponse) -> Self {
        if response.has_tool_calls() {
            Decision::UseTools(response.tool_calls)
        } else {
            Decision::Direct(response.content)
        }
    }
}

/// Answers questions against one model, with the search tools attached.
pub struct Relay {
    client: Arc<dyn LlmClient>,
    tools: SearchTools,
    model: String,
    clock: CivilClock,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Relay {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, clock: CivilClock) -> Self {
        let model = model.into();
        Self {
            tools: SearchTools::new(client.clone(), model.clone()),
            client,
            model,
            clock,
        }
    }

    /// Build a relay for the configured provider and model.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let api_key = config.resolve_api_key();
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
        )
        .map_err(AppError::Config)?;

        Ok(Self::new(client, config.model.clone(), config.clock()?))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Stream the answer to `question`.
    ///
    /// `history` is expected to be trimmed already. Failures never end the
    /// stream abruptly: they surface as a final `❌ Error:` fragment, and
    /// the completion marker is only sent after a successful run. A chunk
    /// that fails to decode is reported inline and streaming goes on; a
    /// lost upstream connection ends the answer.
    pub fn answer(
        self: Arc<Self>,
        question: String,
        history: Vec<ConversationTurn>,
    ) -> AnswerStream {
        Box::pin(async_stream::stream! {
            let prompt = match build_prompt(&question, &history, &self.clock.now()) {
                Ok(prompt) => prompt,
                Err(e) => {
                    yield error_fragment(&e);
                    return;
                }
            };

            let decision = match self.decide(&prompt.text, &prompt.metadata.generated_at).await {
                Ok(decision) => decision,
                Err(e) => {
                    yield error_fragment(&e);
                    return;
                }
            };

            let calls = match decision {
                Decision::Direct(text) => {
                    tracing::info!("Answering directly");
                    yield text;
                    yield COMPLETION_MARKER.to_string();
                    return;
                }
                Decision::UseTools(calls) => calls,
            };

            tracing::info!(tool_calls = calls.len(), "Model requested tools");

            let mut outputs = Vec::with_capacity(calls.len());
            for call in &calls {
                let invocation = match ToolInvocation::from_call(call) {
                    Ok(Some(invocation)) => invocation,
                    Ok(None) => {
                        tracing::warn!(tool = %call.name, "Skipping unknown tool");
                        continue;
                    }
                    Err(e) => {
                        yield error_fragment(&e);
                        return;
                    }
                };

                yield invocation.tool.progress_marker().to_string();

                let result = self.tools.invoke(invocation.tool, &invocation.query).await;
                tracing::debug!(tool = %invocation.tool, success = result.success, "Tool finished");

                match result.to_prompt_text() {
                    Ok(output) => outputs.push(FunctionOutput {
                        name: invocation.tool.as_str().to_string(),
                        output,
                    }),
                    Err(e) => {
                        yield error_fragment(&e);
                        return;
                    }
                }
            }

            yield PROCESSING_MARKER.to_string();

            let request = LlmRequest::new(build_final_prompt(&prompt.text, &outputs), &self.model)
                .with_temperature(RELAY_TEMPERATURE)
                .with_max_tokens(RELAY_MAX_TOKENS)
                .with_streaming();

            let mut chunks = match self.client.stream(&request).await {
                Ok(chunks) => chunks,
                Err(e) => {
                    yield error_fragment(&e);
                    return;
                }
            };

            while let Some(item) = chunks.next().await {
                match item {
                    Ok(chunk) => {
                        if !chunk.content.is_empty() {
                            yield chunk.content;
                        }
                    }
                    Err(e @ AppError::Stream(_)) => {
                        yield error_fragment(&e);
                        return;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Chunk error");
                        yield format!("Chunk error: {}", e);
                    }
                }
            }

            yield COMPLETION_MARKER.to_string();
        })
    }

    /// Decision call: main prompt plus the tool declarations.
    async fn decide(&self, prompt: &str, today: &str) -> AppResult<Decision> {
        let request = LlmRequest::new(prompt, &self.model)
            .with_temperature(RELAY_TEMPERATURE)
            .with_max_tokens(RELAY_MAX_TOKENS)
            .with_tools(function_declarations(today));

        let response = self.client.complete(&request).await?;
        Ok(Decision::from(response))
    }
}

fn error_fragment(error: &AppError) -> String {
    tracing::error!(error = %error, "Answer failed");
    format!("❌ Error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_from_text() {
        let decision = Decision::from(LlmResponse::text("Hi there", "m"));
        assert_eq!(decision, Decision::Direct("Hi there".to_string()));
    }

    #[test]
    fn test_decision_prefers_tool_calls() {
        let mut response = LlmResponse::tool_calls(vec![ToolCall::new("get_quran_response")], "m");
        response.content = "let me check".to_string();

        match Decision::from(response) {
            Decision::UseTools(calls) => assert_eq!(calls[0].name, "get_quran_response"),
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_error_fragment() {
        let fragment = error_fragment(&AppError::Llm("quota exceeded".to_string()));
        assert_eq!(fragment, "❌ Error: LLM error: quota exceeded");
    }
}
