//! Engine configuration
//!
//! Serializable configuration for the pieces this core actually
//! configures, with validated defaults and TOML loading. Collaborator
//! subsystems (assets, audio, persistence) carry their own config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::SchedulerOptions;

/// Configuration loading/validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML source failed to parse
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field value is out of its valid range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Frame scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target frame cadence; omit to run at the host's native refresh
    pub target_fps: Option<u32>,
    /// Maximum permissible delta handed to update, in seconds
    pub max_delta_time: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_fps: None,
            max_delta_time: 0.1,
        }
    }
}

impl SchedulerConfig {
    /// Converts to the scheduler's runtime options
    pub fn to_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            target_fps: self.target_fps,
            max_delta_time: self.max_delta_time,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frame scheduler settings
    pub scheduler: SchedulerConfig,
}

impl EngineConfig {
    /// Parses a configuration from TOML source and validates it
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates field ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.max_delta_time < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scheduler.max_delta_time must be non-negative, got {}",
                self.scheduler.max_delta_time
            )));
        }
        if self.scheduler.target_fps == Some(0) {
            return Err(ConfigError::Invalid(
                "scheduler.target_fps must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.scheduler.max_delta_time - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.scheduler.target_fps, None);
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            [scheduler]
            target_fps = 60
            max_delta_time = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.scheduler.target_fps, Some(60));
        assert!((config.scheduler.max_delta_time - 0.05).abs() < f32::EPSILON);

        let options = config.scheduler.to_options();
        assert_eq!(options.target_fps, Some(60));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.scheduler.target_fps, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let negative = EngineConfig::from_toml_str("[scheduler]\nmax_delta_time = -1.0");
        assert!(matches!(negative, Err(ConfigError::Invalid(_))));

        let zero_fps = EngineConfig::from_toml_str("[scheduler]\ntarget_fps = 0");
        assert!(matches!(zero_fps, Err(ConfigError::Invalid(_))));
    }
}
