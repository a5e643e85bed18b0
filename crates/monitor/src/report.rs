//! Per-tick overlay report

use escalation::{AlertStage, RunValue};
use serde::{Deserialize, Serialize};

/// Snapshot of monitor state after one control-loop tick, intended for
/// a display sink. While armed it always carries the openness metric,
/// closed-run value, episode count, and armed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Operator gate state
    pub armed: bool,
    /// Current alert stage
    pub stage: AlertStage,
    /// Openness sample from the last processed tick, if any
    pub openness: Option<f32>,
    /// Closed-run progress from the last processed tick
    pub run: Option<RunValue>,
    /// Completed drowsiness episodes this session
    pub episode_count: u32,
    /// Sequence number of the frame shown this tick
    pub frame_sequence: Option<u64>,
}

impl TickReport {
    /// Disarmed affordance shown before the operator starts the system.
    pub fn disarmed(frame_sequence: Option<u64>) -> Self {
        Self {
            armed: false,
            stage: AlertStage::Idle,
            openness: None,
            run: None,
            episode_count: 0,
            frame_sequence,
        }
    }

    /// Text lines for the display sink.
    pub fn overlay_lines(&self) -> Vec<String> {
        if !self.armed {
            return vec!["Press 's' to start the system".to_string()];
        }

        let run = match self.run {
            Some(RunValue::Frames(n)) => format!("{} frames", n),
            Some(RunValue::Elapsed(d)) => format!("{:.2}s", d.as_secs_f32()),
            None => "-".to_string(),
        };
        let openness = match self.openness {
            Some(v) => format!("{:.2}", v),
            None => "-".to_string(),
        };
        vec![
            format!("EAR: {}", openness),
            format!("Closed run: {}", run),
            format!("Episodes: {}", self.episode_count),
            format!("Stage: {:?} | Armed: {}", self.stage, self.armed),
        ]
    }
}
