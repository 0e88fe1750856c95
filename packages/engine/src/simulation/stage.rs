// packages/engine/src/simulation/stage.rs
//! Stage runner
//!
//! A stage is one prompt dispatched to the team. Replies are written to the
//! transcript as markdown as soon as each agent answers, then the runner
//! pauses to throttle the backend. Errors are not retried.

use crate::agents::team::{AgentTurn, Team};
use crate::agents::tools::extract_image_url;
use crate::utils::errors::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Destination for rendered turns
pub type Transcript = Arc<Mutex<Box<dyn Write + Send>>>;

/// Transcript printed to standard output
pub fn stdout_transcript() -> Transcript {
    transcript_from(std::io::stdout())
}

/// Transcript over any writer
pub fn transcript_from<W: Write + Send + 'static>(writer: W) -> Transcript {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Result of one executed stage
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub prompt: String,
    pub turns: Vec<AgentTurn>,
    /// First image URL published during the stage
    pub image_url: Option<String>,
}

/// Executes one stage of a simulation
#[async_trait]
pub trait SimulationStage {
    async fn execute_stage(&self, prompt: &str) -> Result<StageOutcome>;
}

/// Dispatches prompts to a team and pauses afterwards
pub struct StageRunner {
    team: Arc<Team>,
    pause: Duration,
    transcript: Transcript,
}

impl StageRunner {
    pub fn new(team: Arc<Team>, pause: Duration, transcript: Transcript) -> Self {
        Self {
            team,
            pause,
            transcript,
        }
    }

    fn write_turn(&self, turn: &AgentTurn) -> Result<()> {
        let mut out = self.transcript.lock();

        write!(out, "### {}\n\n{}\n\n", turn.agent, turn.content)?;
        out.flush()?;

        Ok(())
    }

    fn write_prompt(&self, prompt: &str) -> Result<()> {
        let mut out = self.transcript.lock();

        writeln!(out, "## {}\n", prompt.lines().next().unwrap_or_default())?;

        Ok(())
    }
}

#[async_trait]
impl SimulationStage for StageRunner {
    async fn execute_stage(&self, prompt: &str) -> Result<StageOutcome> {
        info!("Executing stage: {}", prompt.lines().next().unwrap_or_default());

        self.write_prompt(prompt)?;
        let turns = self.team.dispatch(prompt, |turn| self.write_turn(turn)).await?;

        let image_url = turns.iter().find_map(|t| extract_image_url(&t.content));
        if let Some(url) = &image_url {
            info!("Stage published token image {}", url);
        }

        metrics::counter!("memelab_stages_completed_total").increment(1);

        debug!("Pausing {:?} after stage", self.pause);
        tokio::time::sleep(self.pause).await;

        Ok(StageOutcome {
            prompt: prompt.to_string(),
            turns,
            image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::backend::EchoBackend;
    use crate::agents::configurator::{AgentConfigurator, BrainstormConfigurator};
    use crate::agents::role::AgentRole;
    use crate::utils::config::AgentSettings;
    use std::time::Instant;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn team() -> Arc<Team> {
        let echo = Arc::new(EchoBackend::new());
        let configurator =
            BrainstormConfigurator::new(echo.clone(), echo, "echo", AgentSettings::default());

        let members = [
            AgentRole::CommunityRepresentative,
            AgentRole::MarketingLead,
            AgentRole::Designer,
        ]
        .into_iter()
        .map(|role| configurator.configure_agent(role))
        .collect();

        Arc::new(Team::build(members, configurator.shared_memory().clone()).unwrap())
    }

    #[tokio::test]
    async fn test_stage_writes_transcript() {
        let buffer = Buffer::default();
        let runner = StageRunner::new(team(), Duration::ZERO, transcript_from(buffer.clone()));

        let outcome = runner.execute_stage("Round 1: pitch ideas").await.unwrap();
        assert_eq!(outcome.turns.len(), 3);
        assert!(outcome.image_url.is_none());

        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert!(text.starts_with("## Round 1: pitch ideas"));
        assert!(text.contains("### Community Representative"));
        assert!(text.contains("### Designer"));
    }

    #[tokio::test]
    async fn test_stage_captures_image_url() {
        let runner = StageRunner::new(team(), Duration::ZERO, transcript_from(std::io::sink()));

        let outcome = runner
            .execute_stage("Round 4: Designer, make the token image")
            .await
            .unwrap();
        let url = outcome.image_url.expect("designer publishes a URL");
        assert!(url.starts_with("https://images.memelab.invalid/"));
    }

    #[tokio::test]
    async fn test_stage_pauses() {
        let runner = StageRunner::new(
            team(),
            Duration::from_millis(50),
            transcript_from(std::io::sink()),
        );

        let start = Instant::now();
        runner.execute_stage("Round 1: go").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
