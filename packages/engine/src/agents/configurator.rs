// packages/engine/src/agents/configurator.rs
//! Builds role agents around one shared memory

use crate::agents::agent::Agent;
use crate::agents::backend::{ChatBackend, EchoBackend, ImageBackend};
use crate::agents::memory::SharedMemory;
use crate::agents::openai::OpenAiBackend;
use crate::agents::role::{AgentRole, Capability};
use crate::utils::config::{AgentSettings, EngineConfig, Provider};
use crate::utils::errors::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Produces a configured agent for a role
pub trait AgentConfigurator {
    fn configure_agent(&self, role: AgentRole) -> Agent;
}

/// Configurator for the memecoin brainstorm team
///
/// Owns the simulation's shared memory; every agent it builds holds a
/// handle to that same memory.
pub struct BrainstormConfigurator {
    memory: SharedMemory,
    model: String,
    backend: Arc<dyn ChatBackend>,
    image_backend: Arc<dyn ImageBackend>,
    settings: AgentSettings,
}

impl BrainstormConfigurator {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        image_backend: Arc<dyn ImageBackend>,
        model: impl Into<String>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            memory: SharedMemory::new(),
            model: model.into(),
            backend,
            image_backend,
            settings,
        }
    }

    /// Build backends for the configured provider
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let (backend, image_backend): (Arc<dyn ChatBackend>, Arc<dyn ImageBackend>) =
            match config.backend.provider {
                Provider::OpenAi => {
                    let client = Arc::new(OpenAiBackend::from_config(&config.backend)?);
                    let chat: Arc<dyn ChatBackend> = client.clone();
                    let images: Arc<dyn ImageBackend> = client;
                    (chat, images)
                }
                Provider::Echo => {
                    let echo = Arc::new(EchoBackend::new());
                    let chat: Arc<dyn ChatBackend> = echo.clone();
                    let images: Arc<dyn ImageBackend> = echo;
                    (chat, images)
                }
            };

        info!(
            "Agent backend: {:?} ({})",
            config.backend.provider, config.backend.chat_model
        );

        Ok(Self::new(
            backend,
            image_backend,
            config.backend.chat_model.clone(),
            config.agents.clone(),
        ))
    }

    pub fn shared_memory(&self) -> &SharedMemory {
        &self.memory
    }

    /// Configure an agent from a role name such as `"Marketing Lead"`
    pub fn configure_agent_named(&self, name: &str) -> Result<Agent> {
        let role = name.parse::<AgentRole>()?;
        Ok(self.configure_agent(role))
    }
}

impl AgentConfigurator for BrainstormConfigurator {
    fn configure_agent(&self, role: AgentRole) -> Agent {
        debug!("Configuring {} agent", role);

        let agent = Agent::new(
            role,
            self.model.clone(),
            self.memory.clone(),
            Arc::clone(&self.backend),
            self.settings.clone(),
        );

        if role.capabilities().contains(&Capability::ImageGeneration) {
            agent.with_image_backend(Arc::clone(&self.image_backend))
        } else {
            agent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::EngineError;

    fn configurator() -> BrainstormConfigurator {
        let echo = Arc::new(EchoBackend::new());
        BrainstormConfigurator::new(echo.clone(), echo, "gpt-4o", AgentSettings::default())
    }

    #[test]
    fn test_each_role_gets_its_prompts() {
        let configurator = configurator();

        for role in AgentRole::ALL {
            let agent = configurator.configure_agent(role);
            assert_eq!(agent.role(), role);
            assert_eq!(agent.instructions(), role.instructions());
            assert_eq!(agent.system_prompt(), role.system_prompt());
            assert_eq!(agent.model(), "gpt-4o");
            assert!(agent.memory().same_as(configurator.shared_memory()));
        }
    }

    #[test]
    fn test_designer_has_image_generation() {
        let configurator = configurator();

        let designer = configurator.configure_agent_named("Designer").unwrap();
        assert_eq!(designer.capabilities(), vec![Capability::ImageGeneration]);

        for name in ["Community Representative", "Developer", "Marketing Lead"] {
            let agent = configurator.configure_agent_named(name).unwrap();
            assert!(agent.capabilities().is_empty());
        }
    }

    #[test]
    fn test_unknown_role_name() {
        let result = configurator().configure_agent_named("Intern");
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_same_role_twice_is_independent_but_identical() {
        let configurator = configurator();
        let a = configurator.configure_agent(AgentRole::MarketingLead);
        let b = configurator.configure_agent(AgentRole::MarketingLead);

        assert!(a.memory().same_as(b.memory()));
        assert_eq!(a.system_message(), b.system_message());
        assert_eq!(a.capabilities(), b.capabilities());
    }

    #[test]
    fn test_echo_provider_from_config() {
        let mut config = EngineConfig::default();
        config.backend.provider = Provider::Echo;

        let configurator = BrainstormConfigurator::from_config(&config).unwrap();
        let agent = configurator.configure_agent(AgentRole::Designer);
        assert!(agent.has_capability(Capability::ImageGeneration));
    }
}
