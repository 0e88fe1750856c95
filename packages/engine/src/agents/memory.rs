// packages/engine/src/agents/memory.rs
//! Shared conversation memory
//!
//! One `SharedMemory` is created per simulation and cloned into every agent
//! and the team. Clones are handles onto the same log, so a turn written by
//! one agent is visible to the others on their next request.

use crate::agents::message::{ChatMessage, MessageRole};
use parking_lot::RwLock;
use std::sync::Arc;

/// Handle to a conversation log shared by a team
#[derive(Debug, Clone, Default)]
pub struct SharedMemory {
    log: Arc<RwLock<Vec<ChatMessage>>>,
}

impl SharedMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn push(&self, message: ChatMessage) {
        self.log.write().push(message);
    }

    /// Snapshot of the whole log
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.log.read().clone()
    }

    /// Snapshot of the last `limit` messages
    pub fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let log = self.log.read();
        let start = log.len().saturating_sub(limit);
        log[start..].to_vec()
    }

    /// Most recent user prompt
    pub fn last_user_message(&self) -> Option<ChatMessage> {
        self.log
            .read()
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    pub fn clear(&self) {
        self.log.write().clear();
    }

    /// True when both handles point at the same log
    pub fn same_as(&self, other: &SharedMemory) -> bool {
        Arc::ptr_eq(&self.log, &other.log)
    }
}
