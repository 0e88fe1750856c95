// packages/engine/src/observability.rs
//! Tracing and metrics setup
//!
//! `RUST_LOG` takes precedence over the configured log level.

use crate::utils::config::ObservabilityConfig;
use crate::utils::errors::{EngineError, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install tracing and, when configured, the metrics exporter
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    init_tracing(config)?;
    init_metrics(config)
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| EngineError::ConfigError(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| EngineError::ConfigError(format!("Tracing init failed: {}", e)))
}

/// Start the Prometheus exporter when an address is configured
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let Some(addr) = config.metrics_addr.as_deref() else {
        return Ok(());
    };

    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| EngineError::ConfigError(format!("Invalid metrics address {}: {}", addr, e)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| EngineError::ConfigError(format!("Metrics exporter failed: {}", e)))?;

    info!("Prometheus metrics on http://{}/metrics", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_disabled_by_default() {
        assert!(init_metrics(&ObservabilityConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_metrics_listener_installs() {
        let config = ObservabilityConfig {
            metrics_addr: Some("127.0.0.1:0".to_string()),
            ..Default::default()
        };
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_bad_metrics_address() {
        let config = ObservabilityConfig {
            metrics_addr: Some("not-an-address".to_string()),
            ..Default::default()
        };
        assert!(matches!(init_metrics(&config), Err(EngineError::ConfigError(_))));
    }
}
