//! askrelay server library.
//!
//! Wires the model client, the search tools and the prompt builder into a
//! streaming question-answering pipeline, and exposes it over HTTP.

pub mod http;
pub mod pipeline;

pub use http::{router, AppState, GenerateRequest, HealthResponse};
pub use pipeline::{AnswerStream, Decision, Relay, COMPLETION_MARKER, PROCESSING_MARKER};
