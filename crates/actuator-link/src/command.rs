//! Command alphabet
//!
//! Fixed single-byte mapping shared with the controller firmware.
//! Established once at startup and never renegotiated.

use serde::{Deserialize, Serialize};

/// Commands understood by the alert controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorCommand {
    /// Monitoring armed by the operator; firmware enables the motor
    ArmedStart,
    /// Eyes reopened; stand down any transient alert
    EyesOpen,
    /// First drowsiness episode: buzzer only
    Stage1,
    /// Second episode: buzzer + hazard lights
    Stage2,
    /// Third or later episode: brake + hazard + buzzer
    Stage3,
}

impl ActuatorCommand {
    /// Wire byte for this command.
    pub const fn to_byte(self) -> u8 {
        match self {
            ActuatorCommand::ArmedStart => b'S',
            ActuatorCommand::EyesOpen => b'N',
            ActuatorCommand::Stage1 => b'A',
            ActuatorCommand::Stage2 => b'B',
            ActuatorCommand::Stage3 => b'C',
        }
    }

    /// Human-readable effect, for logs and the overlay.
    pub const fn description(self) -> &'static str {
        match self {
            ActuatorCommand::ArmedStart => "armed, motor on",
            ActuatorCommand::EyesOpen => "eyes open",
            ActuatorCommand::Stage1 => "buzzer only",
            ActuatorCommand::Stage2 => "buzzer + hazard lights",
            ActuatorCommand::Stage3 => "brake + hazard + buzzer",
        }
    }
}
