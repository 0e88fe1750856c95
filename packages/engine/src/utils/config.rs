// packages/engine/src/utils/config.rs
//! Engine configuration
//!
//! Values are layered with the `config` crate:
//!
//! 1. Built-in defaults (every section is `#[serde(default)]`)
//! 2. Optional TOML file (`memelab.toml`, or the path in `MEMELAB_CONFIG`)
//! 3. Environment variables, e.g. `MEMELAB__SEEDER__ROWS=50`

use crate::utils::errors::{EngineError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "memelab.toml";

/// Environment variable overriding the configuration file path
pub const CONFIG_PATH_ENV: &str = "MEMELAB_CONFIG";

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub seeder: SeederConfig,
    pub backend: BackendConfig,
    pub agents: AgentSettings,
    pub simulation: SimulationConfig,
    pub observability: ObservabilityConfig,
}

impl EngineConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(&path)
    }

    /// Load configuration from a specific file (missing file is allowed)
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("MEMELAB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: EngineConfig = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.seeder.rows == 0 {
            return Err(EngineError::ConfigError(
                "seeder.rows must be at least 1".to_string(),
            ));
        }

        if self.backend.timeout_secs == 0 {
            return Err(EngineError::ConfigError(
                "backend.timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.simulation.stages.is_empty() {
            return Err(EngineError::ConfigError(
                "simulation.stages cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Context seeder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeederConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Number of rows inserted per run
    pub rows: usize,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("contexts.db"),
            rows: 10,
            seed: None,
        }
    }
}

/// Which backend answers chat and image requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-compatible HTTP API
    OpenAi,

    /// Offline deterministic replies (no network, no credentials)
    Echo,
}

/// LLM and image backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub provider: Provider,

    /// API base URL (point at a local mock to avoid real calls)
    pub base_url: String,

    /// Chat completion model id
    pub chat_model: String,

    /// Image generation model id
    pub image_model: String,

    /// Requested image size
    pub image_size: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Per-request HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Per-agent conversation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Send the shared conversation log with every request
    pub add_history_to_messages: bool,

    /// Most recent history entries sent per request
    pub max_history_messages: usize,

    /// Tool call round trips allowed before a reply must be text
    pub max_tool_rounds: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            add_history_to_messages: true,
            max_history_messages: 50,
            max_tool_rounds: 3,
        }
    }
}

/// One stage of the brainstorm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlan {
    pub title: String,
    pub prompt: String,
}

impl StagePlan {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
        }
    }
}

/// Simulation driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Pause after each stage, throttling the backend
    pub stage_pause_ms: u64,

    /// Brief appended to the first stage prompt
    pub brief: String,

    /// Stages in execution order
    pub stages: Vec<StagePlan>,

    /// Where to write the JSON run report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stage_pause_ms: 2000,
            brief: "Create a memecoin that captures this week's internet mood.".to_string(),
            stages: default_stages(),
            report_path: None,
        }
    }
}

fn default_stages() -> Vec<StagePlan> {
    vec![
        StagePlan::new(
            "Idea Generation",
            "Each of you propose one memecoin idea with a Name, a Ticker and a one-line \
             Description. Explain briefly why it could go viral.",
        ),
        StagePlan::new(
            "Evaluation",
            "Review every idea proposed so far. Score each one from 1 to 10 on community \
             appeal and marketing potential, then name your favourite.",
        ),
        StagePlan::new(
            "Final Round",
            "Agree on a single idea. Reply with 'Final Name:', 'Final Ticker:' and \
             'Final Description:' lines for the chosen memecoin.",
        ),
        StagePlan::new(
            "Token Image",
            "Designer, generate the token image for the final memecoin and output it as \
             'Generated Token Image URL: <url>'. Everyone else, confirm it fits the idea.",
        ),
        StagePlan::new(
            "Launch Announcement",
            "Write one short launch post with the final name, ticker, description and \
             token image URL.",
        ),
    ]
}

/// Logging and metrics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit JSON log lines
    pub json_logs: bool,

    /// Prometheus listener address, e.g. "127.0.0.1:9100"
    pub metrics_addr: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_addr: None,
        }
    }
}
