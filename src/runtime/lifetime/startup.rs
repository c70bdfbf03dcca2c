use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::registry::Registry;
use crate::telemetry::{HttpTelemetryClient, NullTelemetry, TelemetrySink};

pub struct StartupContext {
    pub registry: Arc<Registry>,
}

/// 准备服务器启动的上下文：遥测客户端与注册表
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let telemetry = build_telemetry(config)?;

    let base_url = config.server.public_base_url();
    let registry = Registry::new(base_url.clone(), telemetry)
        .with_default_validity(config.links.default_validity_minutes);
    info!(
        "Registry ready: short links use {}, default validity {} minutes (in-memory only, cleared on restart)",
        base_url, config.links.default_validity_minutes
    );

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        registry: Arc::new(registry),
    })
}

fn build_telemetry(config: &StaticConfig) -> Result<Arc<dyn TelemetrySink>> {
    if !config.telemetry.enabled {
        warn!("Telemetry disabled, events will only be logged locally");
        return Ok(Arc::new(NullTelemetry));
    }

    let client = HttpTelemetryClient::spawn(&config.telemetry)
        .context("Failed to start telemetry client")?;
    info!(
        "Telemetry events will be sent to {} (stack: {})",
        config.telemetry.endpoint, config.telemetry.stack
    );
    Ok(Arc::new(client))
}
