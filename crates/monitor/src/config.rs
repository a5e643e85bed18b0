//! Monitor configuration
//!
//! Defaults <- optional `monitor.toml` <- `MONITOR_*` environment
//! variables, layered via the `config` crate.

use camera_capture::CameraConfig;
use escalation::EscalationConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the monitor binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Cabin camera settings
    pub camera: CameraConfig,

    /// Closure tracking and stage escalation
    pub escalation: EscalationConfig,

    /// Actuator serial device (e.g., "/dev/ttyUSB0" or "COM4")
    pub actuator_device: String,

    /// Actuator baud rate
    pub actuator_baud: u32,

    /// Decimation factor: run detection on every Nth acquired frame.
    /// Skipped frames still reach the overlay unchanged.
    pub process_every: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            escalation: EscalationConfig::default(),
            actuator_device: "/dev/ttyUSB0".to_string(),
            actuator_baud: 9600,
            process_every: 3,
        }
    }
}

impl MonitorConfig {
    /// Load layered configuration.
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&MonitorConfig::default())?;
        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("monitor").required(false))
            .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
            .build()?;
        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = MonitorConfig::default();
        assert_eq!(config.process_every, 3);
        assert_eq!(config.actuator_baud, 9600);
        assert_eq!(config.escalation.openness_threshold, 0.25);
        assert_eq!(config.escalation.trigger_frames, 20);
        assert!(config.escalation.validate().is_ok());
    }

    #[test]
    fn test_load_without_file_or_env_uses_defaults() {
        let loaded = MonitorConfig::load().expect("defaults load");
        assert_eq!(loaded.process_every, MonitorConfig::default().process_every);
    }
}
