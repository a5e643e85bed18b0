//! Staged escalation state machine
//!
//! Debounce comes from the trigger threshold: a blink never reaches it.
//! In the episode-count variant the stage escalates with the number of
//! completed episodes in the session, not with the length of a single
//! closure. Repeated drowsiness events are more dangerous than one long
//! blink; that ordering is the invariant this machine preserves.

use crate::config::{EscalationConfig, EscalationVariant};
use crate::policy::{ClosureState, RunValue};
use actuator_link::ActuatorCommand;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Current alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlertStage {
    #[default]
    Idle,
    /// Buzzer only
    Stage1,
    /// Buzzer + hazard lights
    Stage2,
    /// Brake + hazard + buzzer
    Stage3,
}

impl AlertStage {
    /// Actuator command announcing entry into this stage.
    pub fn command(self) -> Option<ActuatorCommand> {
        match self {
            AlertStage::Idle => None,
            AlertStage::Stage1 => Some(ActuatorCommand::Stage1),
            AlertStage::Stage2 => Some(ActuatorCommand::Stage2),
            AlertStage::Stage3 => Some(ActuatorCommand::Stage3),
        }
    }
}

/// Escalation state machine.
///
/// Owns all escalation state: current stage, completed-episode count,
/// and the once-per-run trigger guard. Episode count never decreases
/// within a session, so in the episode-count variant the stage is
/// monotonically non-decreasing and Stage3 is terminal.
pub struct EscalationMachine {
    config: EscalationConfig,
    stage: AlertStage,
    episode_count: u32,
    triggered: bool,
}

impl EscalationMachine {
    pub fn new(config: EscalationConfig) -> Self {
        Self {
            config,
            stage: AlertStage::Idle,
            episode_count: 0,
            triggered: false,
        }
    }

    /// Advance the machine by one tracker sample.
    ///
    /// Returns at most one command: a stage command the instant a run
    /// triggers (once per run), or the neutral command on a reopening
    /// edge. All other samples are silent.
    pub fn update(&mut self, closure: &ClosureState) -> Option<ActuatorCommand> {
        match self.config.variant {
            EscalationVariant::EpisodeCount => self.update_episode(closure),
            EscalationVariant::DurationStaged => self.update_duration_staged(closure),
        }
    }

    fn update_episode(&mut self, closure: &ClosureState) -> Option<ActuatorCommand> {
        if closure.just_reopened {
            // An episode completes when eyes reopen after a triggered run
            if self.triggered {
                self.episode_count += 1;
                info!("drowsiness episode complete (total {})", self.episode_count);
            }
            self.triggered = false;
            return Some(ActuatorCommand::EyesOpen);
        }

        if closure.is_closed && !self.triggered && self.run_reached_trigger(&closure.run) {
            self.triggered = true;
            // Severity from session history, not from this run's length
            self.stage = match self.episode_count {
                0 => AlertStage::Stage1,
                1 => AlertStage::Stage2,
                _ => AlertStage::Stage3,
            };
            let command = self.stage.command();
            if let Some(cmd) = command {
                info!("{:?} triggered - {}", self.stage, cmd.description());
            }
            return command;
        }

        None
    }

    fn update_duration_staged(&mut self, closure: &ClosureState) -> Option<ActuatorCommand> {
        if closure.just_reopened {
            self.stage = AlertStage::Idle;
            return Some(ActuatorCommand::EyesOpen);
        }

        if !closure.is_closed {
            return None;
        }

        let elapsed_ms = match closure.run.elapsed() {
            Some(d) => d.as_millis() as u64,
            // Frame-count runs carry no duration; validate() rejects
            // this pairing at configuration time
            None => return None,
        };

        let target = if elapsed_ms >= self.config.stage3_ms {
            AlertStage::Stage3
        } else if elapsed_ms >= self.config.stage2_ms {
            AlertStage::Stage2
        } else if elapsed_ms >= self.config.stage1_ms {
            AlertStage::Stage1
        } else {
            AlertStage::Idle
        };

        if target != self.stage {
            self.stage = target;
            let command = target.command();
            if let Some(cmd) = command {
                info!("{:?} entered - {}", target, cmd.description());
            }
            return command;
        }

        None
    }

    fn run_reached_trigger(&self, run: &RunValue) -> bool {
        match run {
            RunValue::Frames(n) => *n >= self.config.trigger_frames,
            RunValue::Elapsed(d) => d.as_millis() as u64 >= self.config.trigger_ms,
        }
    }

    pub fn stage(&self) -> AlertStage {
        self.stage
    }

    pub fn episode_count(&self) -> u32 {
        self.episode_count
    }

    /// Clear all session history (explicit restart only).
    pub fn reset(&mut self) {
        self.stage = AlertStage::Idle;
        self.episode_count = 0;
        self.triggered = false;
    }
}
