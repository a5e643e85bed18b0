//! Camera Capture
//!
//! Frame acquisition for the driver-facing cabin camera:
//! - `VideoFrame`: decoded RGB frame plus capture metadata
//! - `FrameSource`: blocking capture device abstraction
//! - `FrameMailbox`: single-slot, overwrite-on-write bridge between the
//!   acquisition thread and the control loop

pub mod frame;
pub mod mailbox;
pub mod source;

pub use frame::VideoFrame;
pub use mailbox::{FrameMailbox, FrameSource};
pub use source::SyntheticSource;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    /// Device failed to open. Fatal at startup, before any thread spawns.
    #[error("failed to open frame source: {0}")]
    SourceUnavailable(String),

    /// Transient empty read; the caller skips this tick and retries.
    #[error("no frame available")]
    FrameUnavailable,

    /// Device produced an unusable frame or stopped streaming. Contract
    /// surface for external `FrameSource` implementors (capture drivers);
    /// the built-in synthetic source never emits it. The acquisition
    /// thread logs it and keeps polling.
    #[error("streaming error: {0}")]
    Stream(String),
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}
