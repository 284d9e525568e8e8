//! Google Gemini provider implementation.
//!
//! Talks to the Generative Language API:
//! https://ai.google.dev/api/generate-content
//!
//! Function declarations and Google Search grounding both travel in the
//! request's `tools` array.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
use crate::streaming::SseReader;
use crate::types::{ToolCall, ToolDeclaration};
use askrelay_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiTool {
    Functions {
        #[serde(rename = "functionDeclarations")]
        function_declarations: Vec<ToolDeclaration>,
    },
    GoogleSearch {
        google_search: EmptyObject,
    },
}

#[derive(Debug, Default, Serialize)]
struct EmptyObject {}

/// Gemini API response format (also the payload of each SSE event).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    error: Option<GeminiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

impl GeminiResponse {
    fn usage(&self) -> Option<LlmUsage> {
        self.usage_metadata
            .as_ref()
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
    }

    /// Text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Function calls across every candidate, in order.
    fn tool_calls(&self) -> Vec<ToolCall> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|p| p.function_call.as_ref())
            .map(|fc| ToolCall::from_json_args(&fc.name, &fc.args))
            .collect()
    }

    fn into_error(self) -> Result<Self, AppError> {
        match self.error {
            Some(err) => Err(AppError::Llm(format!(
                "Gemini API error ({}): {}",
                err.code.map(|c| c.to_string()).unwrap_or_else(|| "stream".to_string()),
                err.message
            ))),
            None => Ok(self),
        }
    }
}

/// Gemini LLM client.
pub struct GeminiClient {
    /// Base URL up to and including `/models`
    base_url: String,

    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for the public Generative Language API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, model: &str, stream: bool) -> String {
        if stream {
            format!("{}/{}:streamGenerateContent?alt=sse", self.base_url, model)
        } else {
            format!("{}/{}:generateContent", self.base_url, model)
        }
    }

    /// Convert LlmRequest to Gemini format.
    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        let mut tools = Vec::new();
        if !request.tools.is_empty() {
            tools.push(GeminiTool::Functions {
                function_declarations: request.tools.clone(),
            });
        }
        if request.web_search {
            tools.push(GeminiTool::GoogleSearch {
                google_search: EmptyObject::default(),
            });
        }

        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![TextPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_modalities: request.web_search.then(|| vec!["TEXT"]),
            },
            tools,
        }
    }

    /// Convert Gemini response to LlmResponse.
    fn convert_response(&self, response: GeminiResponse, model: &str) -> AppResult<LlmResponse> {
        let response = response.into_error()?;

        if response.candidates.is_empty() {
            return Err(AppError::Llm("Gemini returned no candidates".to_string()));
        }

        Ok(LlmResponse {
            content: response.text(),
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
            tool_calls: response.tool_calls(),
            usage: response.usage().unwrap_or_default(),
        })
    }

    async fn post(&self, url: &str, body: &GeminiRequest) -> AppResult<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Gemini: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Gemini rate limited ({}): {}",
                status, error_text
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

/// Parse one SSE event payload into a stream chunk.
fn parse_stream_event(data: &str, model: &str) -> AppResult<LlmStreamChunk> {
    let response: GeminiResponse = serde_json::from_str(data)
        .map_err(|e| AppError::Llm(format!("Failed to parse chunk: {}", e)))?;
    let response = response.into_error()?;

    let done = response
        .candidates
        .first()
        .map(|c| c.finish_reason.is_some())
        .unwrap_or(false);

    Ok(LlmStreamChunk {
        content: response.text(),
        model: response
            .model_version
            .clone()
            .unwrap_or_else(|| model.to_string()),
        done,
        usage: if done { response.usage() } else { None },
    })
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            model = %request.model,
            tools = request.tools.len(),
            web_search = request.web_search,
            "Sending generateContent request to Gemini"
        );
        tracing::debug!("Request: {:?}", request);

        let body = self.to_gemini_request(request);
        let url = self.api_url(&request.model, false);

        let response = self.post(&url, &body).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        tracing::debug!("Response: {:?}", gemini_response);

        let converted = self.convert_response(gemini_response, &request.model)?;
        tracing::info!(
            tool_calls = converted.tool_calls.len(),
            total_tokens = converted.usage.total_tokens,
            "Received completion from Gemini"
        );

        Ok(converted)
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        tracing::info!(model = %request.model, "Starting streamGenerateContent request to Gemini");
        tracing::debug!("Request: {:?}", request);

        let body = self.to_gemini_request(request);
        let url = self.api_url(&request.model, true);

        let response = self.post(&url, &body).await?;
        let model = request.model.clone();

        let stream = async_stream::stream! {
            let mut reader = SseReader::from_response(response);
            loop {
                match reader.next_event().await {
                    Ok(Some(event)) => yield parse_stream_event(&event.data, &model),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
