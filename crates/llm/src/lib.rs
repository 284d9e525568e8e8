//! LLM integration crate for askrelay.
//!
//! A provider-agnostic abstraction over hosted generative models with
//! function calling and token streaming.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default)
//! - **Mock**: scripted responses for tests and offline runs
//!
//! # Example
//! ```no_run
//! use askrelay_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key");
//! let request = LlmRequest::new("Hello, world!", "gemini-2.0-flash-exp");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod streaming;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, MockClient};
pub use types::{ProviderType, ToolCall, ToolDeclaration};
