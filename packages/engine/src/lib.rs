// packages/engine/src/lib.rs
//! Memelab Engine Library
//!
//! Two independent pipelines share this crate:
//!
//! - **seeder**: Fills a SQLite `contexts` table with randomized rows
//! - **agents**: Role agents, shared memory, chat/image backends, team
//! - **simulation**: Stage runner and the multi-round brainstorm driver
//! - **observability**: Tracing and metrics setup
//! - **utils**: Configuration and error types

// Public module exports
pub mod agents;
pub mod observability;
pub mod seeder;
pub mod simulation;
pub mod utils;

// Re-export commonly used types
pub use agents::{Agent, AgentConfigurator, AgentRole, BrainstormConfigurator, SharedMemory, Team};
pub use seeder::{ContextRow, ContextStore};
pub use simulation::{Simulation, SimulationReport, SimulationStage, StageRunner};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// Build metadata logged by both binaries at startup
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    /// Seconds since the Unix epoch
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rustc_version: env!("RUSTC_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "v{} ({}, built {}, {})",
            self.version, self.git_hash, self.build_timestamp, self.rustc_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_info_line() {
        let info = BuildInfo {
            version: "1.2.3",
            git_hash: "abc1234",
            build_timestamp: "1700000000",
            rustc_version: "rustc 1.80.0",
        };
        assert_eq!(
            info.to_string(),
            "v1.2.3 (abc1234, built 1700000000, rustc 1.80.0)"
        );

        let current = BuildInfo::current().to_string();
        assert!(current.starts_with(&format!("v{} ", VERSION)));
    }
}
