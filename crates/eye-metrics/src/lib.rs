//! Eye Openness Metrics
//!
//! Pure geometry over detected eye landmarks:
//! - Eye aspect ratio (EAR): eyelid-gap-to-eye-width ratio, lower = more closed
//! - Whole-face openness with single-eye fallback

mod metric;

pub use metric::{eye_aspect_ratio, EyeLandmarks, FaceLandmarks, Point2};

use thiserror::Error;

/// Metric error types
#[derive(Error, Debug, PartialEq)]
pub enum MetricError {
    /// Horizontal eye width is zero, the ratio is undefined
    #[error("openness metric undefined: degenerate landmark geometry")]
    Undefined,

    /// Neither eye produced a usable landmark set
    #[error("no eye landmarks available")]
    NoEyes,
}
