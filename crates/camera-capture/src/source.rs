//! Built-in frame sources
//!
//! Real deployments wire a capture driver behind `FrameSource`. The
//! synthetic source stands in when no camera hardware is present, the
//! same way the rest of the pipeline falls back to mock capabilities.

use crate::{CameraConfig, CameraError, FrameSource, VideoFrame};
use std::time::{Duration, Instant};
use tracing::warn;

/// Paced generator of flat mid-gray frames at the configured size and
/// frame rate.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_interval: Duration,
    started: Instant,
    next_frame_at: Instant,
    sequence: u64,
}

impl SyntheticSource {
    /// Startup-time construction; a zero-sized configuration is the
    /// synthetic analog of a camera that fails to open.
    pub fn open(config: &CameraConfig) -> Result<Self, CameraError> {
        if config.width == 0 || config.height == 0 {
            return Err(CameraError::SourceUnavailable(format!(
                "invalid capture size {}x{}",
                config.width, config.height
            )));
        }
        warn!(
            "no capture driver for {}, using synthetic {}x{} source",
            config.device, config.width, config.height
        );
        let now = Instant::now();
        Ok(Self {
            width: config.width,
            height: config.height,
            frame_interval: Duration::from_millis(1000 / config.fps.max(1) as u64),
            started: now,
            next_frame_at: now,
            sequence: 0,
        })
    }
}

impl FrameSource for SyntheticSource {
    fn read(&mut self) -> Result<VideoFrame, CameraError> {
        let now = Instant::now();
        if now < self.next_frame_at {
            std::thread::sleep(self.next_frame_at - now);
        }
        self.next_frame_at += self.frame_interval;
        self.sequence += 1;

        let data = vec![128u8; (self.width * self.height * 3) as usize];
        Ok(VideoFrame::new(
            data,
            self.width,
            self.height,
            self.started.elapsed().as_millis() as u64,
            self.sequence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_fails_to_open() {
        let config = CameraConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            SyntheticSource::open(&config),
            Err(CameraError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_frames_are_sequential_and_sized() {
        let config = CameraConfig {
            width: 16,
            height: 8,
            fps: 1000,
            ..Default::default()
        };
        let mut source = SyntheticSource::open(&config).unwrap();
        let first = source.read().unwrap();
        let second = source.read().unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(first.data.len(), 16 * 8 * 3);
    }
}
