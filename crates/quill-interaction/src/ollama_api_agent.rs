//! OllamaApiAgent - streaming REST client for a local Ollama endpoint.
//!
//! One request is issued per user turn carrying the full message history,
//! with streaming enabled and strict JSON output requested. The reply
//! arrives as newline-delimited chunk envelopes whose content fragments are
//! folded, in arrival order, into a single accumulator.

use std::env;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use quill_core::error::{QuillError, Result};
use quill_core::session::ConversationMessage;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5-coder:14b";

/// Receives each content fragment as it arrives, for rendering.
///
/// Accumulation is pure and happens inside the agent; the sink only
/// observes fragments, so the assembler is testable without a terminal.
pub trait FragmentSink {
    /// Called once per non-empty content fragment, in arrival order.
    fn on_fragment(&mut self, fragment: &str);
}

impl<F: FnMut(&str)> FragmentSink for F {
    fn on_fragment(&mut self, fragment: &str) {
        self(fragment)
    }
}

/// Agent that talks to the Ollama chat HTTP API.
#[derive(Clone)]
pub struct OllamaApiAgent {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaApiAgent {
    /// Creates a new agent for the given endpoint and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// `OLLAMA_BASE_URL` defaults to `http://localhost:11434` and
    /// `OLLAMA_MODEL_NAME` to `qwen2.5-coder:14b`.
    pub fn from_env() -> Self {
        let base_url = env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("OLLAMA_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(base_url, model)
    }

    /// The model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Streams one chat completion for the given message history.
    ///
    /// Each fragment is forwarded to `sink` as it arrives; the return value
    /// is the fully accumulated reply text. Endpoint unreachability and
    /// non-success statuses map to [`QuillError::Transport`].
    pub async fn chat_stream(
        &self,
        messages: &[ConversationMessage],
        sink: &mut dyn FragmentSink,
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
            format: "json",
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| QuillError::transport(None, format!("Ollama request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(map_http_error(response).await);
        }

        let mut stream = response.bytes_stream();
        let mut assembler = ChunkAssembler::new();

        while let Some(item) = stream.next().await {
            let bytes = item
                .map_err(|err| QuillError::transport(None, format!("stream failure: {err}")))?;
            assembler.push_bytes(&bytes, sink)?;
        }

        let accumulated = assembler.finish(sink)?;
        tracing::debug!(bytes = accumulated.len(), "stream complete");
        Ok(accumulated)
    }
}

async fn map_http_error(response: reqwest::Response) -> QuillError {
    let status: StatusCode = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read Ollama error body".to_string());
    QuillError::transport(Some(status.as_u16()), body)
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    stream: bool,
    format: &'a str,
}

/// One newline-delimited chunk envelope from the Ollama stream.
///
/// Absence of the nested content field means no content delta in that
/// chunk; the `done` flag is advisory, stream end is the end of the chunk
/// sequence.
#[derive(Deserialize)]
struct ChunkEnvelope {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    #[allow(dead_code)]
    done: Option<bool>,
}

#[derive(Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Folds raw network reads into complete NDJSON lines and concatenates
/// their content fragments. Network reads align with neither line nor
/// UTF-8 character boundaries, so the partial trailing line is buffered as
/// raw bytes and only decoded once its newline arrives.
pub struct ChunkAssembler {
    buffer: Vec<u8>,
    accumulated: String,
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            accumulated: String::new(),
        }
    }

    /// Consumes one network read, emitting fragments for every complete
    /// line it finishes.
    pub fn push_bytes(&mut self, bytes: &[u8], sink: &mut dyn FragmentSink) -> Result<()> {
        self.buffer.extend_from_slice(bytes);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.consume_line(&line[..line.len() - 1], sink)?;
        }
        Ok(())
    }

    /// Flushes a trailing partial line and returns the accumulated text.
    pub fn finish(mut self, sink: &mut dyn FragmentSink) -> Result<String> {
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.consume_line(&line, sink)?;
        }
        Ok(self.accumulated)
    }

    fn consume_line(&mut self, line: &[u8], sink: &mut dyn FragmentSink) -> Result<()> {
        let line = std::str::from_utf8(line).map_err(|err| {
            QuillError::transport(None, format!("invalid UTF-8 in stream chunk: {err}"))
        })?;
        if line.trim().is_empty() {
            return Ok(());
        }

        let envelope: ChunkEnvelope = serde_json::from_str(line)
            .map_err(|err| QuillError::transport(None, format!("invalid stream chunk: {err}")))?;

        if let Some(content) = envelope.message.and_then(|msg| msg.content) {
            if !content.is_empty() {
                sink.on_fragment(&content);
                self.accumulated.push_str(&content);
            }
        }
        Ok(())
    }
}
