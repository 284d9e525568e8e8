//! Server-Sent Events (SSE) reader.
//!
//! Gemini streams `streamGenerateContent?alt=sse` responses as SSE. The
//! reader is generic over any buffered async source so it can be fed a
//! reqwest body in production and a byte slice in tests.

use askrelay_core::{AppError, AppResult};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::bytes::Bytes;
use tokio_util::io::StreamReader;

/// Boxed body byte stream.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// A single SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` field, when present
    pub event: Option<String>,
    /// Joined `data:` lines
    pub data: String,
}

/// Pull-based SSE event reader.
pub struct SseReader<R> {
    lines: Lines<R>,
}

impl SseReader<BufReader<StreamReader<ByteStream, Bytes>>> {
    /// Read events from an HTTP response body.
    pub fn from_response(response: reqwest::Response) -> Self {
        let bytes: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map(|result| result.map_err(std::io::Error::other)),
        );
        Self::new(BufReader::new(StreamReader::new(bytes)))
    }
}

impl<R: AsyncBufRead + Unpin> SseReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Next complete event, or `None` at end of stream.
    pub async fn next_event(&mut self) -> AppResult<Option<SseEvent>> {
        let mut event: Option<String> = None;
        let mut data = String::new();

        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| AppError::Stream(e.to_string()))?;

            let Some(line) = line else {
                // Flush a trailing event with no terminating blank line
                if data.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(SseEvent { event, data }));
            };

            if line.is_empty() {
                if !data.is_empty() {
                    return Ok(Some(SseEvent { event, data }));
                }
                event = None;
                continue;
            }

            if let Some(value) = line.strip_prefix("event:") {
                event = Some(value.trim_start().to_string());
            } else if let Some(value) = line.strip_prefix("data:") {
                if !data.is_empty() {
                    data.push('\n');
                }
                data.push_str(value.strip_prefix(' ').unwrap_or(value));
            }
            // id:, retry: and comments are ignored
        }
    }
}
