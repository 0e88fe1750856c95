// packages/engine/src/agents/mod.rs
//! Brainstorm agents
//!
//! - **Role**: The four fixed roles with their static prompts
//! - **Memory**: Conversation log shared by one team
//! - **Backend**: Chat / image traits and the offline echo backend
//! - **OpenAI**: HTTP client for OpenAI-compatible APIs
//! - **Agent**: Role-bound agent with the image tool loop
//! - **Configurator**: Builds agents around a shared memory
//! - **Team**: Dispatches one prompt to all members
//!
//! ```text
//! BrainstormConfigurator ──owns──► SharedMemory ◄──┐
//!        │ configure_agent(role)                   │ clones
//!        ▼                                         │
//!  Agent × 4 ──────────────────────────────────────┤
//!        │                                         │
//!  Team [Community Rep, Marketing Lead, Designer] ─┘
//! ```

pub mod agent;
pub mod backend;
pub mod configurator;
pub mod memory;
pub mod message;
pub mod openai;
pub mod role;
pub mod team;
pub mod tools;

pub use agent::Agent;
pub use backend::{ChatBackend, ChatReply, ChatRequest, EchoBackend, ImageBackend, ToolSpec};
pub use configurator::{AgentConfigurator, BrainstormConfigurator};
pub use memory::SharedMemory;
pub use message::{ChatMessage, MessageRole, ToolCall};
pub use openai::OpenAiBackend;
pub use role::{AgentRole, Capability};
pub use team::{AgentTurn, Team};
pub use tools::{extract_image_url, format_image_url};
