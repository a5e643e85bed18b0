//! Drowsiness Monitor
//!
//! Orchestrates the alert pipeline: frames from the mailbox are decimated,
//! run through the landmark detection capability and the openness metric,
//! then fed to the escalation engine whose commands go out over the
//! actuator link. Exposes the operator armed/disarmed gate and a per-tick
//! overlay report.

pub mod config;
pub mod control;
pub mod detector;
pub mod report;

pub use config::MonitorConfig;
pub use control::{MonitorLoop, OperatorSignal};
pub use detector::{BoundingBox, FaceDetection, LandmarkDetector, StaticDetector};
pub use report::TickReport;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialise the global tracing subscriber. Call once from the binary.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
