//! LLM provider factory.
//!
//! Creates the configured client. Secrets are resolved by the caller and
//! passed in explicitly.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, MockClient};
use crate::types::ProviderType;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required for Gemini)
///
/// # Errors
/// Returns error if the provider is unknown or a required key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Gemini) => {
            let api_key = api_key.ok_or_else(|| "Gemini provider requires API key".to_string())?;
            let client = match endpoint {
                Some(base_url) => GeminiClient::with_base_url(api_key, base_url),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        Some(ProviderType::Mock) => Ok(Arc::new(MockClient::new())),
        None => Err(format!("Unknown provider: {}", provider)),
    }
}
