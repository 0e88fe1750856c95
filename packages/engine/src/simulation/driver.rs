// packages/engine/src/simulation/driver.rs
//! Simulation driver
//!
//! Runs the configured stages strictly in order. Stage `n` (1-based) is
//! sent as `Round n: <prompt>`; the user's brief is appended to round 1.

use crate::agents::agent::Agent;
use crate::agents::configurator::{AgentConfigurator, BrainstormConfigurator};
use crate::agents::role::AgentRole;
use crate::agents::team::Team;
use crate::simulation::stage::{SimulationStage, StageOutcome, StageRunner, Transcript};
use crate::utils::config::{EngineConfig, SimulationConfig, StagePlan};
use crate::utils::errors::{EngineError, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use ulid::Ulid;

/// Roles dispatched to by the team, in speaking order
pub const TEAM_ROLES: [AgentRole; 3] = [
    AgentRole::CommunityRepresentative,
    AgentRole::MarketingLead,
    AgentRole::Designer,
];

/// One executed stage with its position
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub round: usize,
    pub title: String,
    pub outcome: StageOutcome,
}

/// Everything a simulation run produced
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub stages: Vec<StageRecord>,
}

impl SimulationReport {
    /// Most recent token image URL published by any stage
    pub fn image_url(&self) -> Option<&str> {
        self.stages
            .iter()
            .rev()
            .find_map(|s| s.outcome.image_url.as_deref())
    }

    /// Write the report as pretty-printed JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_string_pretty(self).map_err(|e| {
            EngineError::StorageFailed(format!("Failed to encode report: {}", e))
        })?;
        std::fs::write(path, body)?;

        info!("Report written to {:?}", path);
        Ok(())
    }
}

/// A configured brainstorm: team, developer and stage plan
pub struct Simulation {
    run_id: Ulid,
    team: Arc<Team>,
    developer: Agent,
    stages: Vec<StagePlan>,
    pause: Duration,
    transcript: Transcript,
}

impl Simulation {
    pub fn new(
        configurator: BrainstormConfigurator,
        config: &SimulationConfig,
        transcript: Transcript,
    ) -> Result<Self> {
        let memory = configurator.shared_memory().clone();

        let members = TEAM_ROLES
            .into_iter()
            .map(|role| configurator.configure_agent(role))
            .collect();
        let developer = configurator.configure_agent(AgentRole::Developer);
        let team = Team::build(members, memory)?;

        Ok(Self {
            run_id: Ulid::new(),
            team: Arc::new(team),
            developer,
            stages: config.stages.clone(),
            pause: Duration::from_millis(config.stage_pause_ms),
            transcript,
        })
    }

    /// Build configurator, team and stages from engine configuration
    pub fn from_config(config: &EngineConfig, transcript: Transcript) -> Result<Self> {
        let configurator = BrainstormConfigurator::from_config(config)?;
        Self::new(configurator, &config.simulation, transcript)
    }

    pub fn run_id(&self) -> Ulid {
        self.run_id
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    /// The developer is configured on the shared memory but not on the team
    pub fn developer(&self) -> &Agent {
        &self.developer
    }

    /// Render every stage prompt, rejecting empty ones
    pub fn round_prompts(&self, brief: &str) -> Result<Vec<String>> {
        if self.stages.is_empty() {
            return Err(EngineError::InvalidArgument(
                "simulation has no stages".to_string(),
            ));
        }

        self.stages
            .iter()
            .enumerate()
            .map(|(idx, stage)| {
                let prompt = stage.prompt.trim();
                if prompt.is_empty() {
                    return Err(EngineError::InvalidArgument(format!(
                        "stage {} ('{}') has an empty prompt",
                        idx + 1,
                        stage.title
                    )));
                }

                let mut text = format!("Round {}: {}", idx + 1, prompt);
                if idx == 0 && !brief.trim().is_empty() {
                    text.push_str("\n\nBrief: ");
                    text.push_str(brief.trim());
                }

                Ok(text)
            })
            .collect()
    }

    /// Run all stages in order
    pub async fn run(&self, brief: &str) -> Result<SimulationReport> {
        let prompts = self.round_prompts(brief)?;

        info!(
            "Simulation {} starting with {} stages",
            self.run_id,
            prompts.len()
        );

        let mut records = Vec::with_capacity(prompts.len());

        for (idx, (plan, prompt)) in self.stages.iter().zip(prompts).enumerate() {
            let round = idx + 1;
            info!("Round {}: {}", round, plan.title);

            let runner = StageRunner::new(
                Arc::clone(&self.team),
                self.pause,
                Arc::clone(&self.transcript),
            );
            let outcome = runner.execute_stage(&prompt).await?;

            records.push(StageRecord {
                round,
                title: plan.title.clone(),
                outcome,
            });
        }

        info!("Simulation {} finished", self.run_id);

        Ok(SimulationReport {
            run_id: self.run_id.to_string(),
            stages: records,
        })
    }
}
