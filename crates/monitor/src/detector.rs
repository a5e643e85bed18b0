//! Landmark detection capability contract
//!
//! Face/landmark detection is an external capability consumed through
//! this trait: per frame it reports zero or more faces, each carrying
//! eye landmarks in the coordinates of the frame it was handed. Zero
//! faces is a normal outcome, not an error. The call is synchronous and
//! unbounded; a capability that hangs stalls the control loop by design.

use camera_capture::VideoFrame;
use eye_metrics::{EyeLandmarks, FaceLandmarks, Point2};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Face bounding box in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// One detected face with its eye landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bbox: BoundingBox,
    pub landmarks: FaceLandmarks,
}

/// Detection capability consumed by the control loop.
pub trait LandmarkDetector: Send {
    /// All faces visible in the frame; empty when none.
    fn detect(&mut self, frame: &VideoFrame) -> Vec<FaceDetection>;
}

/// The driver is the largest face in the cabin frame; everything else
/// (passengers, reflections) is ignored for the tick.
pub fn select_driver_face(faces: &[FaceDetection]) -> Option<&FaceDetection> {
    faces
        .iter()
        .max_by(|a, b| a.bbox.area().total_cmp(&b.bbox.area()))
}

/// Placeholder capability for running the pipeline without a real
/// detector wired in: reports one centred face with fully open eyes.
pub struct StaticDetector;

impl StaticDetector {
    pub fn new() -> Self {
        warn!("no landmark detection capability configured, using static detector");
        Self
    }
}

impl Default for StaticDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkDetector for StaticDetector {
    fn detect(&mut self, frame: &VideoFrame) -> Vec<FaceDetection> {
        // A near-black frame means the camera is covered or IR is off;
        // report no face rather than a fabricated one
        let gray = frame.to_grayscale();
        if !gray.is_empty() {
            let mean = gray.iter().map(|&v| v as u64).sum::<u64>() / gray.len() as u64;
            if mean < 10 {
                return vec![];
            }
        }

        let w = frame.width as f32;
        let h = frame.height as f32;
        let bbox = BoundingBox {
            x: w * 0.3,
            y: h * 0.2,
            width: w * 0.4,
            height: h * 0.5,
        };
        let eye_width = bbox.width * 0.2;
        let left = open_eye_at(bbox.x + bbox.width * 0.2, bbox.y + bbox.height * 0.3, eye_width);
        let right = open_eye_at(bbox.x + bbox.width * 0.6, bbox.y + bbox.height * 0.3, eye_width);
        vec![FaceDetection {
            bbox,
            landmarks: FaceLandmarks::new(Some(left), Some(right)),
        }]
    }
}

/// Synthetic eye landmarks with an EAR of ~0.3 (open).
fn open_eye_at(x: f32, y: f32, width: f32) -> EyeLandmarks {
    synthetic_eye(x, y, width, 0.3)
}

/// Build six landmarks whose aspect ratio equals `openness` exactly:
/// corners `width` apart, both lid gaps `openness * width`.
pub fn synthetic_eye(x: f32, y: f32, width: f32, openness: f32) -> EyeLandmarks {
    let gap = openness * width;
    EyeLandmarks::new([
        Point2::new(x, y),
        Point2::new(x + width * 0.25, y + gap / 2.0),
        Point2::new(x + width * 0.75, y + gap / 2.0),
        Point2::new(x + width, y),
        Point2::new(x + width * 0.75, y - gap / 2.0),
        Point2::new(x + width * 0.25, y - gap / 2.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use eye_metrics::eye_aspect_ratio;

    #[test]
    fn test_synthetic_eye_hits_requested_openness() {
        for openness in [0.0, 0.1, 0.25, 0.5] {
            let eye = synthetic_eye(10.0, 20.0, 40.0, openness);
            let ear = eye_aspect_ratio(&eye).unwrap();
            assert!((ear - openness).abs() < 1e-4, "openness {}", openness);
        }
    }

    #[test]
    fn test_largest_face_selected() {
        let face = |area_side: f32| FaceDetection {
            bbox: BoundingBox {
                x: 0.0,
                y: 0.0,
                width: area_side,
                height: area_side,
            },
            landmarks: FaceLandmarks::default(),
        };
        let faces = vec![face(10.0), face(50.0), face(30.0)];
        let driver = select_driver_face(&faces).unwrap();
        assert_eq!(driver.bbox.width, 50.0);
    }

    #[test]
    fn test_no_faces_selects_none() {
        assert!(select_driver_face(&[]).is_none());
    }

    #[test]
    fn test_static_detector_sees_nothing_in_the_dark() {
        use camera_capture::VideoFrame;

        let mut detector = StaticDetector::new();
        let dark = VideoFrame::new(vec![0; 8 * 8 * 3], 8, 8, 0, 0);
        assert!(detector.detect(&dark).is_empty());

        let lit = VideoFrame::new(vec![128; 8 * 8 * 3], 8, 8, 0, 1);
        let faces = detector.detect(&lit);
        assert_eq!(faces.len(), 1);
        assert!(faces[0].landmarks.openness().unwrap() > 0.25);
    }
}
