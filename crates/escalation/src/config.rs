//! Escalation configuration

use crate::EscalationError;
use serde::{Deserialize, Serialize};

/// How continuous eye closure is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosurePolicyKind {
    /// Count consecutive below-threshold processed samples. Cadence
    /// independent once paired with a fixed sampling interval; the
    /// primary policy.
    #[default]
    FrameCount,
    /// Wall-clock time since closure onset. Sensitive to processing
    /// jitter; kept as the documented alternative.
    Duration,
}

/// How a closure run is mapped onto alert stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscalationVariant {
    /// Stage chosen from the count of completed episodes in this session;
    /// repeated drowsiness events escalate, a single long blink does not.
    #[default]
    EpisodeCount,
    /// Stage chosen directly from elapsed closed duration against three
    /// ascending thresholds; reopening resets to idle, no cross-episode
    /// memory. Requires the duration tracker policy.
    DurationStaged,
}

/// Escalation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Openness (EAR) below this counts as closed
    pub openness_threshold: f32,

    /// Tracker policy selection
    pub policy: ClosurePolicyKind,

    /// Machine variant selection
    pub variant: EscalationVariant,

    /// Episode trigger: consecutive closed samples (frame-count policy)
    pub trigger_frames: u32,

    /// Episode trigger: continuous closed time (duration policy, ms)
    pub trigger_ms: u64,

    /// Duration-staged thresholds (ms), ascending
    pub stage1_ms: u64,
    pub stage2_ms: u64,
    pub stage3_ms: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            openness_threshold: 0.25,
            policy: ClosurePolicyKind::default(),
            variant: EscalationVariant::default(),
            trigger_frames: 20,
            trigger_ms: 1500,
            stage1_ms: 1500,
            stage2_ms: 3000,
            stage3_ms: 5000,
        }
    }
}

impl EscalationConfig {
    /// Reject combinations the engine does not define.
    pub fn validate(&self) -> Result<(), EscalationError> {
        if self.variant == EscalationVariant::DurationStaged
            && self.policy == ClosurePolicyKind::FrameCount
        {
            return Err(EscalationError::Config(
                "duration-staged escalation requires the duration tracker policy".into(),
            ));
        }
        if !(self.openness_threshold > 0.0) {
            return Err(EscalationError::Config(
                "openness threshold must be positive".into(),
            ));
        }
        if self.stage1_ms >= self.stage2_ms || self.stage2_ms >= self.stage3_ms {
            return Err(EscalationError::Config(
                "stage thresholds must be strictly ascending".into(),
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
        assert!(EscalationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_duration_staged_needs_duration_policy() {
        let config = EscalationConfig {
            variant: EscalationVariant::DurationStaged,
            policy: ClosurePolicyKind::FrameCount,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EscalationConfig {
            variant: EscalationVariant::DurationStaged,
            policy: ClosurePolicyKind::Duration,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stage_thresholds_must_ascend() {
        let config = EscalationConfig {
            stage2_ms: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
