//! Search-grounded tool wrappers.
//!
//! Each wrapper makes one independent, non-streaming model call with web
//! search grounding enabled and never fails: errors become a
//! [`ToolResult`] with `success: false`.

use crate::types::{ToolName, ToolResult};
use askrelay_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

pub const SEARCH_MAX_TOKENS: u32 = 8000;
pub const GENERAL_TEMPERATURE: f32 = 0.3;
pub const QURAN_TEMPERATURE: f32 = 0.2;

const QURAN_SOURCE: &str = "quran.com";
const QURAN_CONTENT_TYPE: &str = "Islamic/Quranic guidance";
const QURAN_NOTE: &str =
    "Comprehensive Islamic response with Quranic verses, reasoning, and links to quran.com";

/// Runs the search tools against one model.
#[derive(Clone)]
pub struct SearchTools {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl std::fmt::Debug for SearchTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTools")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .finish()
    }
}

impl SearchTools {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub async fn invoke(&self, tool: ToolName, query: &str) -> ToolResult {
        match tool {
            ToolName::GeneralResponse => self.general_response(query).await,
            ToolName::QuranResponse => self.quran_response(query).await,
        }
    }

    /// Answer a general question with Google Search grounding.
    pub async fn general_response(&self, query: &str) -> ToolResult {
        tracing::info!(query = %query, "Performing general search");

        let request = LlmRequest::new(query, &self.model)
            .with_temperature(GENERAL_TEMPERATURE)
            .with_max_tokens(SEARCH_MAX_TOKENS)
            .with_web_search();

        match self.client.complete(&request).await {
            Ok(response) => ToolResult::success(query, response.content),
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "General search failed");
                ToolResult::failure(query, format!("Search failed: {}", e))
            }
        }
    }

    /// Answer an Islamic-knowledge question from quran.com.
    pub async fn quran_response(&self, query: &str) -> ToolResult {
        tracing::info!(query = %query, "Performing Quran search");

        let request = LlmRequest::new(quran_query(query), &self.model)
            .with_temperature(QURAN_TEMPERATURE)
            .with_max_tokens(SEARCH_MAX_TOKENS)
            .with_web_search();

        match self.client.complete(&request).await {
            Ok(response) => {
                let mut result =
                    ToolResult::success(query, format_quran_answer(query, &response.content))
                        .with_source(QURAN_SOURCE);
                result.content_type = Some(QURAN_CONTENT_TYPE.to_string());
                result.note = Some(QURAN_NOTE.to_string());
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "Quran search failed");
                ToolResult::failure(query, format!("Quran search failed: {}", e))
                    .with_source(QURAN_SOURCE)
            }
        }
    }
}

/// Rewrite a query so the search is scoped to quran.com and the answer
/// comes back as Arabic, translation and link.
fn quran_query(query: &str) -> String {
    format!(
        "Search site:quran.com for information about: {}\n\n\
         Provide Islamic response with:\n\
         - Arabic verse first, then English translation\n\
         - Quran.com URL links\n\
         - Brief explanation from Islamic perspective\n\n\
         Format: **Arabic:** [text] **Translation:** [text] **Link:** [quran.com URL]",
        query
    )
}

fn format_quran_answer(query: &str, body: &str) -> String {
    format!(
        "🕌 **Islamic Guidance on: {}**\n\n{}\n\n📚 **Source**: Quran.com search results\n🔗 **For more details, visit**: https://quran.com",
        query, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use askrelay_llm::MockClient;

    fn tools_with(mock: &Arc<MockClient>) -> SearchTools {
        SearchTools::new(mock.clone(), "gemini-2.0-flash-exp")
    }

    #[tokio::test]
    async fn test_general_success() {
        let mock = Arc::new(MockClient::new());
        mock.push_text("Sunny, 31°C");

        let result = tools_with(&mock).general_response("weather in KL").await;

        assert!(result.success);
        assert_eq!(result.response.as_deref(), Some("Sunny, 31°C"));
        assert_eq!(result.query, "weather in KL");
        assert_eq!(result.search_enhanced, Some(true));
        assert!(result.search_source.is_none());

        let request = &mock.requests()[0];
        assert_eq!(request.prompt, "weather in KL");
        assert_eq!(request.temperature, Some(GENERAL_TEMPERATURE));
        assert_eq!(request.max_tokens, Some(SEARCH_MAX_TOKENS));
        assert!(request.web_search);
        assert!(request.tools.is_empty());
    }

    #[tokio::test]
    async fn test_general_failure_keeps_error_text() {
        let mock = Arc::new(MockClient::new());
        mock.push_error("quota exceeded");

        let result = tools_with(&mock).general_response("weather in KL").await;

        assert!(!result.success);
        assert_eq!(result.query, "weather in KL");
        let error = result.error.unwrap();
        assert!(error.starts_with("Search failed: "));
        assert!(error.contains("quota exceeded"));
        assert!(result.response.is_none());
    }

    #[tokio::test]
    async fn test_quran_success_wraps_answer() {
        let mock = Arc::new(MockClient::new());
        mock.push_text("**Arabic:** ... **Translation:** Indeed, Allah is with the patient.");

        let result = tools_with(&mock).quran_response("patience").await;
        let response = result.response.clone().unwrap();

        assert!(result.success);
        assert!(response.starts_with("🕌 **Islamic Guidance on: patience**\n\n"));
        assert!(response.contains("Indeed, Allah is with the patient."));
        assert!(response.ends_with(
            "\n\n📚 **Source**: Quran.com search results\n🔗 **For more details, visit**: https://quran.com"
        ));
        assert_eq!(result.search_source.as_deref(), Some("quran.com"));
        assert_eq!(result.content_type.as_deref(), Some("Islamic/Quranic guidance"));
        assert!(result.note.is_some());
    }

    #[tokio::test]
    async fn test_quran_request_is_scoped() {
        let mock = Arc::new(MockClient::new());
        tools_with(&mock).quran_response("charity").await;

        let request = &mock.requests()[0];
        assert!(request
            .prompt
            .starts_with("Search site:quran.com for information about: charity"));
        assert!(request.prompt.contains("**Arabic:**"));
        assert_eq!(request.temperature, Some(QURAN_TEMPERATURE));
        assert!(request.web_search);
    }

    #[tokio::test]
    async fn test_quran_failure() {
        let mock = Arc::new(MockClient::new());
        mock.push_error("timeout");

        let result = tools_with(&mock).quran_response("charity").await;

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Quran search failed: "));
        assert_eq!(result.search_source.as_deref(), Some("quran.com"));
        assert_eq!(result.query, "charity");
    }

    #[tokio::test]
    async fn test_invoke_dispatches_by_name() {
        let mock = Arc::new(MockClient::new());
        mock.push_text("a");
        mock.push_text("b");
        let tools = tools_with(&mock);

        let general = tools.invoke(ToolName::GeneralResponse, "q1").await;
        let quran = tools.invoke(ToolName::QuranResponse, "q2").await;

        assert_eq!(general.response.as_deref(), Some("a"));
        assert!(quran.response.unwrap().contains("Islamic Guidance on: q2"));
    }
}
