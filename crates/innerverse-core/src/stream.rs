//! Streaming response consumer for the external AI backend.
//!
//! The backend answers with a plain chunked text body, no framing. The
//! consumer decodes incrementally, tolerating multi-byte characters split
//! across chunk boundaries, and hands the accumulated-so-far text to a
//! caller-supplied sink after every chunk, in transport order. It performs
//! no rendering and no storage writes of its own.

use crate::error::CoreError;
use futures_util::{Stream, StreamExt};
use innerverse_protocol::AskRequest;
use log::debug;
use std::pin::pin;
use std::time::Duration;
use tokio::time::timeout;

/// Per-chunk deadline for a streamed response. A stalled upstream
/// connection surfaces as an error instead of hanging the page.
pub const CHUNK_TIMEOUT: Duration = Duration::from_secs(30);

/// Incremental UTF-8 decoder that carries incomplete sequences between
/// chunks. Decoding state is never reset per chunk.
#[derive(Debug, Default)]
pub struct Utf8Accumulator {
    text: String,
    carry: Vec<u8>,
}

impl Utf8Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, appending to the running text. Bytes that form an
    /// incomplete trailing sequence are held for the next chunk; invalid
    /// bytes decode to U+FFFD.
    pub fn push(&mut self, chunk: &[u8]) {
        self.carry.extend_from_slice(chunk);
        let buf = std::mem::take(&mut self.carry);
        let mut cursor = 0;
        while cursor < buf.len() {
            match std::str::from_utf8(&buf[cursor..]) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    cursor = buf.len();
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if valid_up_to > 0 {
                        if let Ok(valid) = std::str::from_utf8(&buf[cursor..cursor + valid_up_to])
                        {
                            self.text.push_str(valid);
                        }
                        cursor += valid_up_to;
                    }
                    match err.error_len() {
                        Some(invalid) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            cursor += invalid;
                        }
                        None => {
                            // Incomplete tail: keep it for the next chunk.
                            self.carry = buf[cursor..].to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Text decoded so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Finish decoding. A dangling incomplete sequence at end of stream
    /// decodes to U+FFFD.
    pub fn finish(mut self) -> String {
        if !self.carry.is_empty() {
            self.text.push(char::REPLACEMENT_CHARACTER);
        }
        self.text
    }
}

/// Consume a fallible byte-chunk stream into a string, invoking `on_delta`
/// with the accumulated text after every chunk.
///
/// Chunks reach the sink in the exact order the transport delivered them;
/// there is no reordering and no batching beyond the transport's own. When
/// `chunk_timeout` is set, a read that exceeds it fails with
/// [`CoreError::StreamTimeout`].
pub async fn consume_text_stream<S, B, E>(
    stream: S,
    chunk_timeout: Option<Duration>,
    mut on_delta: impl FnMut(&str),
) -> Result<String, CoreError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut stream = pin!(stream);
    let mut accumulator = Utf8Accumulator::new();
    loop {
        let next = match chunk_timeout {
            Some(limit) => match timeout(limit, stream.next()).await {
                Ok(next) => next,
                Err(_) => return Err(CoreError::StreamTimeout(limit)),
            },
            None => stream.next().await,
        };
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(|err| CoreError::Upstream(format!("stream error: {err}")))?;
        accumulator.push(chunk.as_ref());
        on_delta(accumulator.as_str());
    }
    Ok(accumulator.finish())
}

/// Client for the external AI backend.
///
/// The backend is opaque: one authorized POST in, one chunked text body
/// out. Prompt construction lives in [`crate::prompt`].
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    chunk_timeout: Option<Duration>,
}

impl AiClient {
    /// Create a client for the given endpoint and bearer token.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
            chunk_timeout: Some(CHUNK_TIMEOUT),
        }
    }

    /// Override the per-chunk deadline; `None` disables enforcement.
    pub fn with_chunk_timeout(mut self, chunk_timeout: Option<Duration>) -> Self {
        self.chunk_timeout = chunk_timeout;
        self
    }

    /// Ask the backend and stream the answer through `on_delta`.
    ///
    /// Fails with [`CoreError::Upstream`] on a non-success status and with
    /// [`CoreError::EmptyResponse`] when the stream completes normally but
    /// yields only whitespace.
    pub async fn stream_answer(
        &self,
        request: &AskRequest,
        on_delta: impl FnMut(&str),
    ) -> Result<String, CoreError> {
        debug!(
            "asking ai backend (question_len={}, tags={})",
            request.question.len(),
            request.tags.len()
        );
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Upstream(format!("ai backend returned {status}")));
        }
        let text =
            consume_text_stream(response.bytes_stream(), self.chunk_timeout, on_delta).await?;
        if text.trim().is_empty() {
            return Err(CoreError::EmptyResponse);
        }
        Ok(text)
    }
}
