//! 配置值验证模块
//!
//! 启动时校验静态配置，拒绝明显无法工作的组合。

use super::StaticConfig;
use crate::errors::{LinkpulseError, Result};

const LOG_FORMATS: [&str; 2] = ["text", "json"];

impl StaticConfig {
    /// 校验配置是否合法
    pub fn validate(&self) -> Result<()> {
        if self.links.default_validity_minutes == 0 {
            return Err(LinkpulseError::config(
                "links.default_validity_minutes must be greater than 0",
            ));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(LinkpulseError::config(format!(
                "Invalid logging.format '{}'. Valid: {:?}",
                self.logging.format, LOG_FORMATS
            )));
        }

        if let Some(ref public_url) = self.server.public_url
            && !public_url.trim().is_empty()
        {
            url::Url::parse(public_url.trim()).map_err(|e| {
                LinkpulseError::config(format!("Invalid server.public_url '{}': {}", public_url, e))
            })?;
        }

        if self.telemetry.enabled {
            url::Url::parse(&self.telemetry.endpoint).map_err(|e| {
                LinkpulseError::config(format!(
                    "Invalid telemetry.endpoint '{}': {}",
                    self.telemetry.endpoint, e
                ))
            })?;

            if self.telemetry.queue_capacity == 0 {
                return Err(LinkpulseError::config(
                    "telemetry.queue_capacity must be greater than 0",
                ));
            }

            if self.telemetry.timeout_ms == 0 {
                return Err(LinkpulseError::config(
                    "telemetry.timeout_ms must be greater than 0",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StaticConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_validity_rejected() {
        let mut config = StaticConfig::default();
        config.links.default_validity_minutes = 0;
        assert!(matches!(config.validate(), Err(LinkpulseError::Config(_))));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(config.validate(), Err(LinkpulseError::Config(_))));
    }

    #[test]
    fn test_bad_endpoint_only_matters_when_enabled() {
        let mut config = StaticConfig::default();
        config.telemetry.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        config.telemetry.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let mut config = StaticConfig::default();
        config.telemetry.queue_capacity = 0;
        assert!(config.validate().is_err());
    }
}
