// packages/engine/src/agents/backend.rs
//! Backend seams for chat completion and image generation
//!
//! Agents only see the [`ChatBackend`] and [`ImageBackend`] traits. The
//! OpenAI-compatible client lives in `agents::openai`; [`EchoBackend`]
//! answers offline so the scaffold runs without credentials.

use crate::agents::message::{ChatMessage, MessageRole, ToolCall};
use crate::agents::tools::IMAGE_TOOL_NAME;
use crate::utils::errors::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Function tool offered to the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: serde_json::Value,
}

/// One chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    /// Name of the requesting agent
    pub agent: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
}

impl ChatRequest {
    /// Content of the most recent user message
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }

    pub fn offers_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }
}

/// Model reply: text, tool calls, or both
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// Chat completion provider
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// Image generation provider
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generate an image and return its URL
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

/// Deterministic offline backend
///
/// Replies echo the latest prompt under the agent's name. When the image
/// tool is offered and the prompt asks for an image, the first reply is a
/// `generate_image` call and the follow-up quotes the tool result.
#[derive(Debug, Default)]
pub struct EchoBackend {
    calls: AtomicU64,
}

impl EchoBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_call_id(&self) -> String {
        format!("call_{}", self.calls.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        let prompt = request.last_user_content().unwrap_or_default();

        if let Some(last) = request.messages.last() {
            if last.role == MessageRole::Tool {
                return Ok(ChatReply::text(format!("Token image ready.\n{}", last.content)));
            }
        }

        if request.offers_tool(IMAGE_TOOL_NAME) && prompt.to_lowercase().contains("image") {
            debug!("Echo backend requesting an image for {}", request.agent);

            return Ok(ChatReply {
                content: None,
                tool_calls: vec![ToolCall {
                    id: self.next_call_id(),
                    name: IMAGE_TOOL_NAME.to_string(),
                    arguments: serde_json::json!({ "prompt": prompt }).to_string(),
                }],
            });
        }

        let headline = prompt.lines().next().unwrap_or_default();
        Ok(ChatReply::text(format!("[{}] {}", request.agent, headline)))
    }
}

#[async_trait]
impl ImageBackend for EchoBackend {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        prompt.hash(&mut hasher);

        Ok(format!(
            "https://images.memelab.invalid/token-{:016x}.png",
            hasher.finish()
        ))
    }
}
