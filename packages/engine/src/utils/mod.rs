// packages/engine/src/utils/mod.rs
//! Common utilities shared by both pipelines
//!
//! - **errors**: Engine-wide error type and `Result` alias
//! - **config**: Layered configuration (file + environment)

pub mod config;
pub mod errors;

pub use config::EngineConfig;
pub use errors::{EngineError, Result};
