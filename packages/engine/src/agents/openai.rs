// packages/engine/src/agents/openai.rs
//! OpenAI-compatible chat and image client
//!
//! Talks to `{base_url}/chat/completions` and `{base_url}/images/generations`.
//! Point `backend.base_url` at a local mock to keep runs off the real API.

use crate::agents::backend::{ChatBackend, ChatReply, ChatRequest, ImageBackend};
use crate::agents::message::{ChatMessage, MessageRole, ToolCall};
use crate::utils::config::BackendConfig;
use crate::utils::errors::{EngineError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// HTTP client for an OpenAI-compatible API
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    image_model: String,
    image_size: String,
}

impl OpenAiBackend {
    /// Build from configuration, reading the key from `api_key_env`
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            EngineError::ConfigError(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;

        Self::with_api_key(config, api_key)
    }

    /// Build from configuration with an explicit key
    pub fn with_api_key(config: &BackendConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineError::BackendFailed(format!(
                "{} returned {}: {}",
                url, status, detail
            )));
        }

        Ok(response)
    }
}

/// Request body for `/chat/completions`
pub fn chat_request_body(request: &ChatRequest) -> Value {
    let messages: Vec<Value> = request.messages.iter().map(wire_message).collect();

    let mut body = json!({
        "model": request.model,
        "messages": messages,
    });

    if !request.tools.is_empty() {
        let tools: Vec<Value> = request
            .tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect();
        body["tools"] = Value::Array(tools);
    }

    body
}

fn wire_message(message: &ChatMessage) -> Value {
    let role = match message.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    };

    let mut wire = json!({ "role": role, "content": message.content });

    if let Some(name) = &message.name {
        wire["name"] = Value::String(wire_name(name));
    }

    if let Some(id) = &message.tool_call_id {
        wire["tool_call_id"] = Value::String(id.clone());
    }

    if !message.tool_calls.is_empty() {
        let calls: Vec<Value> = message
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": { "name": call.name, "arguments": call.arguments },
                })
            })
            .collect();
        wire["tool_calls"] = Value::Array(calls);
    }

    wire
}

/// The API only accepts `[A-Za-z0-9_-]` in participant names
fn wire_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

/// Decode a `/chat/completions` response body
pub fn parse_chat_reply(body: Value) -> Result<ChatReply> {
    let response: CompletionResponse = serde_json::from_value(body).map_err(|e| {
        EngineError::BackendFailed(format!("Malformed completion response: {}", e))
    })?;

    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::BackendFailed("Completion has no choices".to_string()))?
        .message;

    Ok(ChatReply {
        content: message.content,
        tool_calls: message
            .tool_calls
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// Decode an `/images/generations` response body
pub fn parse_image_url(body: Value) -> Result<String> {
    let response: ImagesResponse = serde_json::from_value(body)
        .map_err(|e| EngineError::BackendFailed(format!("Malformed image response: {}", e)))?;

    response
        .data
        .into_iter()
        .find_map(|image| image.url)
        .ok_or_else(|| EngineError::BackendFailed("Image response has no URL".to_string()))
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        let body = chat_request_body(request);
        let response = self.post_json("chat/completions", &body).await?;
        let value: Value = response.json().await?;

        parse_chat_reply(value)
    }
}

#[async_trait]
impl ImageBackend for OpenAiBackend {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "n": 1,
            "size": self.image_size,
        });

        let response = self.post_json("images/generations", &body).await?;
        let value: Value = response.json().await?;

        parse_image_url(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::tools::image_tool_spec;

    #[test]
    fn test_missing_api_key() {
        let config = BackendConfig {
            api_key_env: "MEMELAB_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };

        let result = OpenAiBackend::from_config(&config);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_endpoint_join() {
        let config = BackendConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let backend = OpenAiBackend::with_api_key(&config, "k").unwrap();
        assert_eq!(
            backend.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            agent: "Designer".to_string(),
            messages: vec![
                ChatMessage::system("sys"),
                ChatMessage::assistant("Marketing Lead", "idea"),
                ChatMessage::tool_request(
                    "Designer",
                    "",
                    vec![ToolCall {
                        id: "call_1".to_string(),
                        name: "generate_image".to_string(),
                        arguments: "{}".to_string(),
                    }],
                ),
                ChatMessage::tool_result("call_1", "Generated Token Image URL: u"),
            ],
            tools: vec![image_tool_spec()],
        };

        let body = chat_request_body(&request);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][1]["name"], "Marketing_Lead");
        assert_eq!(body["messages"][2]["tool_calls"][0]["function"]["name"], "generate_image");
        assert_eq!(body["messages"][3]["role"], "tool");
        assert_eq!(body["messages"][3]["tool_call_id"], "call_1");
        assert_eq!(body["tools"][0]["type"], "function");
    }

    #[test]
    fn test_no_tools_key_without_tools() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            agent: "Developer".to_string(),
            messages: vec![ChatMessage::user("hi")],
            tools: vec![],
        };
        assert!(chat_request_body(&request).get("tools").is_none());
    }

    #[test]
    fn test_parse_chat_reply() {
        let reply = parse_chat_reply(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": { "name": "generate_image", "arguments": "{\"prompt\":\"doge\"}" }
                    }]
                }
            }]
        }))
        .unwrap();

        assert!(reply.content.is_none());
        assert_eq!(reply.tool_calls[0].id, "call_9");

        let text = parse_chat_reply(json!({
            "choices": [{ "message": { "role": "assistant", "content": "hello" } }]
        }))
        .unwrap();
        assert_eq!(text, ChatReply::text("hello"));

        assert!(parse_chat_reply(json!({ "choices": [] })).is_err());
    }

    /// Accept one connection, drain the request, answer with `status` and `body`
    async fn one_shot_server(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);

                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/v1", addr)
    }

    #[tokio::test]
    async fn test_error_status_is_backend_failure() {
        let base_url = one_shot_server("429 Too Many Requests", "quota exceeded").await;
        let config = BackendConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        };
        let backend = OpenAiBackend::with_api_key(&config, "k").unwrap();

        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            agent: "Developer".to_string(),
            messages: vec![ChatMessage::user("hi")],
            tools: vec![],
        };

        match backend.complete(&request).await {
            Err(EngineError::BackendFailed(msg)) => {
                assert!(msg.contains("/v1/chat/completions"), "{}", msg);
                assert!(msg.contains("429"), "{}", msg);
                assert!(msg.contains("quota exceeded"), "{}", msg);
            }
            other => panic!("expected BackendFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_image_error_status_is_backend_failure() {
        let base_url = one_shot_server("500 Internal Server Error", "boom").await;
        let config = BackendConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        };
        let backend = OpenAiBackend::with_api_key(&config, "k").unwrap();

        let err = backend.generate_image("doge").await.unwrap_err();
        assert!(matches!(err, EngineError::BackendFailed(ref msg) if msg.contains("500")));
    }

    #[test]
    fn test_parse_image_url() {
        let url = parse_image_url(json!({ "data": [{ "url": "https://img/1.png" }] })).unwrap();
        assert_eq!(url, "https://img/1.png");

        let err = parse_image_url(json!({ "data": [{ "b64_json": "..." }] }));
        assert!(matches!(err, Err(EngineError::BackendFailed(_))));
    }
}
