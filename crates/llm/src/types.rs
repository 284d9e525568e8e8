//! Tool-calling types shared by providers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A function the model may ask the relay to call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// Parameter schema in the provider's schema dialect
    pub parameters: serde_json::Value,
}

/// A structured request from the model to invoke a declared tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: BTreeMap<String, String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Build from raw JSON arguments. Non-string values keep their JSON text.
    pub fn from_json_args(name: impl Into<String>, args: &serde_json::Value) -> Self {
        let arguments = args
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(k, v)| {
                        let value = match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), value)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    Mock,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_matches_config_providers() {
        for name in askrelay_core::config::KNOWN_PROVIDERS {
            let provider = ProviderType::parse(name).unwrap();
            assert_eq!(provider.as_str(), name);
        }
    }

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("gemini"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("Gemini"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("google"), None);
        assert_eq!(ProviderType::parse("mock"), Some(ProviderType::Mock));
        assert_eq!(ProviderType::parse("ollama"), None);
        assert_eq!(ProviderType::Gemini.as_str(), "gemini");
    }

    #[test]
    fn test_tool_call_from_json_args() {
        let call = ToolCall::from_json_args(
            "get_general_response",
            &json!({"query": "weather today", "limit": 3}),
        );
        assert_eq!(call.argument("query"), Some("weather today"));
        assert_eq!(call.argument("limit"), Some("3"));
        assert_eq!(call.argument("missing"), None);
    }

    #[test]
    fn test_tool_call_from_non_object_args() {
        let call = ToolCall::from_json_args("noop", &serde_json::Value::Null);
        assert!(call.arguments.is_empty());
    }
}
