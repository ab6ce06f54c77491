//! AI Feedback Gateway
//!
//! This module hides the language-model backend behind a single call: send an
//! instruction, get text back. Failures never propagate to the caller; they are
//! classified, logged and replaced with a sentinel string so an interactive
//! session survives a flaky network call.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::GatewayError;

/// Defines the contract for anything that can answer a single instruction.
///
/// Every call is independent: no conversation history is carried between
/// calls, and implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    /// Sends `instruction` and returns the reply, or a sentinel error string.
    async fn respond(&self, instruction: &str) -> String;
}

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Base URL, e.g. `https://api.x.ai/v1`.
    pub api_base: String,
    pub api_key: String,
    /// Model identifier, e.g. `grok-2-latest`.
    pub model: String,
    /// Whole-request timeout; expiry is reported as a transport failure.
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    temperature: f32,
}

/// A `FeedbackGateway` for any OpenAI-compatible chat-completions API.
pub struct ChatCompletionsGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsGateway {
    /// Creates a new gateway.
    ///
    /// Fails only if the underlying HTTP client cannot be constructed (for
    /// example when no TLS backend is available).
    pub fn new(settings: GatewaySettings) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        let endpoint = format!(
            "{}/chat/completions",
            settings.api_base.trim_end_matches('/')
        );
        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key,
            model: settings.model,
        })
    }

    /// Performs the request and classifies any failure.
    pub async fn try_respond(&self, instruction: &str) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: instruction,
            }],
            stream: false,
            temperature: 0.0,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Sending instruction to AI backend");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Format(format!("status {status}, body is not JSON: {e}")))?;

        extract_reply(&data)
    }
}

#[async_trait]
impl FeedbackGateway for ChatCompletionsGateway {
    async fn respond(&self, instruction: &str) -> String {
        match self.try_respond(instruction).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "AI request failed");
                e.sentinel()
            }
        }
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions reply.
///
/// A body carrying an `error` member is a backend error; anything else that
/// lacks the content path is a format error.
pub fn extract_reply(data: &Value) -> Result<String, GatewayError> {
    if let Some(content) = data
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return Ok(content.to_string());
    }

    if let Some(error) = data.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(GatewayError::Backend(message));
    }

    Err(GatewayError::Format(data.to_string()))
}
