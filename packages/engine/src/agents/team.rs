// packages/engine/src/agents/team.rs
//! Team aggregator
//!
//! Sends one prompt to every member in order. Members see each other's
//! replies through the shared memory; there is no voting or arbitration.

use crate::agents::agent::Agent;
use crate::agents::memory::SharedMemory;
use crate::agents::message::ChatMessage;
use crate::agents::role::AgentRole;
use crate::utils::errors::{EngineError, Result};
use serde::Serialize;
use tracing::{debug, info};

/// One member's reply to a dispatched prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentTurn {
    pub agent: String,
    pub role: AgentRole,
    pub content: String,
}

/// Ordered agents sharing one memory
#[derive(Debug)]
pub struct Team {
    members: Vec<Agent>,
    memory: SharedMemory,
}

impl Team {
    /// Wrap `agents`; every member must hold `memory`
    pub fn build(agents: Vec<Agent>, memory: SharedMemory) -> Result<Self> {
        if agents.is_empty() {
            return Err(EngineError::InvalidArgument(
                "a team needs at least one agent".to_string(),
            ));
        }

        if let Some(stray) = agents.iter().find(|a| !a.memory().same_as(&memory)) {
            return Err(EngineError::InvalidArgument(format!(
                "{} is bound to a different memory than the team",
                stray.name()
            )));
        }

        info!(
            "Team assembled: {}",
            agents.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            members: agents,
            memory,
        })
    }

    pub fn members(&self) -> &[Agent] {
        &self.members
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn contains(&self, role: AgentRole) -> bool {
        self.members.iter().any(|a| a.role() == role)
    }

    /// Send `prompt` to all members, handing each reply to `on_turn` as it lands
    pub async fn dispatch<F>(&self, prompt: &str, mut on_turn: F) -> Result<Vec<AgentTurn>>
    where
        F: FnMut(&AgentTurn) -> Result<()> + Send,
    {
        self.memory.push(ChatMessage::user(prompt));

        let mut turns = Vec::with_capacity(self.members.len());

        for member in &self.members {
            debug!("Dispatching to {}", member.name());

            let content = member.respond().await?;
            let turn = AgentTurn {
                agent: member.name().to_string(),
                role: member.role(),
                content,
            };

            on_turn(&turn)?;
            turns.push(turn);
        }

        Ok(turns)
    }
}
