// packages/engine/src/agents/agent.rs
//! A single role-bound agent
//!
//! Each request carries:
//! - the role's system prompt, label and instruction list
//! - the recent shared history (when enabled)
//! - the image tool, for agents wired with an image backend
//!
//! Replies are appended to the shared memory under the agent's name.

use crate::agents::backend::{ChatBackend, ChatRequest, ImageBackend, ToolSpec};
use crate::agents::memory::SharedMemory;
use crate::agents::message::{ChatMessage, ToolCall};
use crate::agents::role::{AgentRole, Capability};
use crate::agents::tools::{
    extract_image_url, format_image_url, image_tool_spec, ImageToolArgs, IMAGE_TOOL_NAME,
};
use crate::utils::config::AgentSettings;
use crate::utils::errors::{EngineError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An agent bound to a role, a backend and a shared memory
pub struct Agent {
    role: AgentRole,
    model: String,
    memory: SharedMemory,
    backend: Arc<dyn ChatBackend>,
    image_backend: Option<Arc<dyn ImageBackend>>,
    settings: AgentSettings,
}

impl Agent {
    pub fn new(
        role: AgentRole,
        model: impl Into<String>,
        memory: SharedMemory,
        backend: Arc<dyn ChatBackend>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            role,
            model: model.into(),
            memory,
            backend,
            image_backend: None,
            settings,
        }
    }

    /// Wire an image backend, enabling the `generate_image` tool
    pub fn with_image_backend(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.image_backend = Some(backend);
        self
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn name(&self) -> &'static str {
        self.role.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        self.role.instructions()
    }

    pub fn system_prompt(&self) -> &'static str {
        self.role.system_prompt()
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    /// Capabilities actually wired into this agent
    pub fn capabilities(&self) -> Vec<Capability> {
        let mut caps = Vec::new();
        if self.image_backend.is_some() {
            caps.push(Capability::ImageGeneration);
        }
        caps
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// System prompt followed by the role label and instruction list
    pub fn system_message(&self) -> String {
        let mut text = format!("{}\n\nYour role: {}", self.system_prompt(), self.role.label());

        text.push_str("\n\nInstructions:");
        for instruction in self.instructions() {
            text.push_str("\n- ");
            text.push_str(instruction);
        }

        text
    }

    fn tool_specs(&self) -> Vec<ToolSpec> {
        if self.image_backend.is_some() {
            vec![image_tool_spec()]
        } else {
            Vec::new()
        }
    }

    fn compose_messages(&self) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_message())];

        if self.settings.add_history_to_messages {
            messages.extend(self.memory.recent(self.settings.max_history_messages));
        } else if let Some(prompt) = self.memory.last_user_message() {
            messages.push(prompt);
        }

        messages
    }

    /// Record `prompt` in memory, then answer it
    pub async fn run(&self, prompt: &str) -> Result<String> {
        self.memory.push(ChatMessage::user(prompt));
        self.respond().await
    }

    /// Answer the conversation as it stands in memory
    pub async fn respond(&self) -> Result<String> {
        let tools = self.tool_specs();
        let mut messages = self.compose_messages();
        let mut tool_outputs: Vec<String> = Vec::new();

        for round in 0..=self.settings.max_tool_rounds {
            let request = ChatRequest {
                model: self.model.clone(),
                agent: self.name().to_string(),
                messages: messages.clone(),
                tools: tools.clone(),
            };

            debug!(
                "{} sending {} messages (round {})",
                self.name(),
                request.messages.len(),
                round
            );
            metrics::counter!("memelab_backend_requests_total", "agent" => self.role.slug())
                .increment(1);

            let reply = self.backend.complete(&request).await?;

            if reply.tool_calls.is_empty() {
                let content = self.finish_content(reply.content.unwrap_or_default(), &tool_outputs);
                if content.trim().is_empty() {
                    warn!("{} returned an empty reply", self.name());
                }
                self.memory
                    .push(ChatMessage::assistant(self.name(), content.clone()));
                return Ok(content);
            }

            messages.push(ChatMessage::tool_request(
                self.name(),
                reply.content.unwrap_or_default(),
                reply.tool_calls.clone(),
            ));

            for call in &reply.tool_calls {
                let output = self.call_tool(call).await?;
                tool_outputs.push(output.clone());
                messages.push(ChatMessage::tool_result(&call.id, output));
            }
        }

        Err(EngineError::BackendFailed(format!(
            "{} still requested tools after {} rounds",
            self.name(),
            self.settings.max_tool_rounds
        )))
    }

    /// Keep the image hand-off in the visible text even if the model dropped it
    fn finish_content(&self, content: String, tool_outputs: &[String]) -> String {
        if extract_image_url(&content).is_some() {
            return content;
        }

        match tool_outputs.iter().rev().find(|o| extract_image_url(o).is_some()) {
            Some(line) if content.trim().is_empty() => line.clone(),
            Some(line) => format!("{}\n\n{}", content.trim_end(), line),
            None => content,
        }
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<String> {
        match (call.name.as_str(), &self.image_backend) {
            (IMAGE_TOOL_NAME, Some(images)) => {
                let args: ImageToolArgs = serde_json::from_str(&call.arguments).map_err(|e| {
                    EngineError::BackendFailed(format!("Bad {} arguments: {}", IMAGE_TOOL_NAME, e))
                })?;

                let url = images.generate_image(&args.prompt).await?;
                info!("{} generated token image {}", self.name(), url);

                Ok(format_image_url(&url))
            }
            (name, _) => Err(EngineError::BackendFailed(format!(
                "{} requested unavailable tool '{}'",
                self.name(),
                name
            ))),
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("model", &self.model)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
