//! Escalation Engine
//!
//! Turns noisy per-sample eye-openness readings into a debounced,
//! monotonically escalating alert policy:
//! - `ClosurePolicy`: run-length tracking of continuous eye closure
//!   (frame-count or wall-clock duration)
//! - `EscalationMachine`: maps closure runs and episode history onto
//!   discrete alert stages, one actuator command per transition

pub mod config;
pub mod machine;
pub mod policy;

pub use config::{ClosurePolicyKind, EscalationConfig, EscalationVariant};
pub use machine::{AlertStage, EscalationMachine};
pub use policy::{ClosurePolicy, ClosureState, DurationPolicy, FrameCountPolicy, RunValue};

use thiserror::Error;

/// Escalation configuration errors
#[derive(Error, Debug, PartialEq)]
pub enum EscalationError {
    /// Selected tracker policy and machine variant cannot be combined
    #[error("invalid configuration: {0}")]
    Config(String),
}
