// packages/engine/src/simulation/mod.rs
//! Brainstorm simulation
//!
//! - **Stage**: `SimulationStage` trait and the `StageRunner` implementation
//! - **Driver**: Ordered stage plan executed against one team
//!
//! ```text
//! Simulation::run(brief)
//!   ├─ Round 1: prompt + brief ─► StageRunner ─► Team ─► transcript
//!   ├─ (pause)
//!   ├─ Round 2: prompt ─────────► StageRunner ─► Team ─► transcript
//!   └─ ...
//! ```

pub mod driver;
pub mod stage;

pub use driver::{Simulation, SimulationReport, StageRecord, TEAM_ROLES};
pub use stage::{
    stdout_transcript, transcript_from, SimulationStage, StageOutcome, StageRunner, Transcript,
};
