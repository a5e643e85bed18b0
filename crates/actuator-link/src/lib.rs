//! Actuator Link
//!
//! One-way, byte-oriented command channel to the serial alert controller
//! (buzzer, hazard lights, brake). Best effort by contract: commands are
//! single bytes, never acknowledged, never retried, never queued. The
//! physical medium can stall or drop bytes; callers log a failed write
//! and move on.

mod command;
mod link;

pub use command::ActuatorCommand;
pub use link::ActuatorLink;

use thiserror::Error;

/// Actuator link error types
#[derive(Error, Debug)]
pub enum ActuatorError {
    /// Serial device failed to open
    #[error("failed to open actuator device: {0}")]
    Open(String),

    /// A command byte could not be written. Best effort only; the caller
    /// logs this and continues.
    #[error("actuator write failed: {0}")]
    WriteFailed(String),
}

impl From<std::io::Error> for ActuatorError {
    fn from(err: std::io::Error) -> Self {
        ActuatorError::WriteFailed(err.to_string())
    }
}
