//! Video frame type and preprocessing helpers

use serde::{Deserialize, Serialize};

/// Decoded RGB video frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (milliseconds since session start)
    pub timestamp_ms: u64,
    /// Frame sequence number
    pub sequence: u64,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ms: u64, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ms,
            sequence,
        }
    }

    /// Get pixel at (x, y). `None` out of bounds, and `None` rather
    /// than a panic if a source delivered fewer than
    /// `width * height * 3` bytes.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        let pixel = self.data.get(idx..idx + 3)?;
        Some([pixel[0], pixel[1], pixel[2]])
    }

    /// Grayscale plane (width * height), BT.601 luminance
    pub fn to_grayscale(&self) -> Vec<u8> {
        let mut gray = Vec::with_capacity((self.width * self.height) as usize);
        for pixel in self.data.chunks_exact(3) {
            let y = (pixel[0] as f32 * 0.299
                + pixel[1] as f32 * 0.587
                + pixel[2] as f32 * 0.114) as u8;
            gray.push(y);
        }
        gray
    }

    /// Half-resolution copy for the detector. Detection runs on the
    /// reduced frame; overlays and display use the original.
    pub fn half_resolution(&self) -> VideoFrame {
        let new_width = (self.width / 2).max(1);
        let new_height = (self.height / 2).max(1);
        let mut data = Vec::with_capacity((new_width * new_height * 3) as usize);

        for y in 0..new_height {
            for x in 0..new_width {
                let src_x = (x * 2).min(self.width - 1);
                let src_y = (y * 2).min(self.height - 1);
                match self.get_pixel(src_x, src_y) {
                    Some(pixel) => data.extend_from_slice(&pixel),
                    None => data.extend_from_slice(&[0, 0, 0]),
                }
            }
        }

        VideoFrame {
            data,
            width: new_width,
            height: new_height,
            timestamp_ms: self.timestamp_ms,
            sequence: self.sequence,
        }
    }
}
