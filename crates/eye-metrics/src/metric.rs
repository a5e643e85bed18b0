//! Eye aspect ratio computation

use crate::MetricError;
use serde::{Deserialize, Serialize};

/// 2-D point in image-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Six ordered landmarks for one eye, in image-pixel coordinates of the
/// frame they were extracted from.
///
/// Fixed index layout:
/// - 0: outer corner
/// - 1, 2: upper eyelid
/// - 3: inner corner
/// - 4, 5: lower eyelid (mirroring indices 2 and 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarks {
    pub points: [Point2; 6],
}

impl EyeLandmarks {
    pub fn new(points: [Point2; 6]) -> Self {
        Self { points }
    }
}

/// Eye aspect ratio for a single eye.
///
/// EAR = (|p1 - p5| + |p2 - p4|) / (2 * |p0 - p3|)
///
/// The numerator sums the two vertical eyelid gaps, the denominator is
/// twice the horizontal eye width. Practical range is roughly [0, 0.6];
/// a closed eye sits well below 0.2.
pub fn eye_aspect_ratio(eye: &EyeLandmarks) -> Result<f32, MetricError> {
    let p = &eye.points;
    let horizontal = p[0].distance(&p[3]);
    if horizontal == 0.0 {
        return Err(MetricError::Undefined);
    }
    let vertical = p[1].distance(&p[5]) + p[2].distance(&p[4]);
    Ok(vertical / (2.0 * horizontal))
}

/// Per-face eye landmarks as reported by the detection capability.
///
/// The detector contract allows either eye to be absent (occlusion,
/// profile pose). Openness falls back to the single available eye.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub left_eye: Option<EyeLandmarks>,
    pub right_eye: Option<EyeLandmarks>,
}

impl FaceLandmarks {
    pub fn new(left_eye: Option<EyeLandmarks>, right_eye: Option<EyeLandmarks>) -> Self {
        Self { left_eye, right_eye }
    }

    /// Whole-face openness: mean of both eyes when both are present,
    /// the single eye's value when only one is. A degenerate eye is
    /// treated as absent; if neither eye yields a value the metric is
    /// unavailable for this face.
    pub fn openness(&self) -> Result<f32, MetricError> {
        let left = self.left_eye.as_ref().and_then(|e| eye_aspect_ratio(e).ok());
        let right = self.right_eye.as_ref().and_then(|e| eye_aspect_ratio(e).ok());

        match (left, right) {
            (Some(l), Some(r)) => Ok((l + r) / 2.0),
            (Some(v), None) | (None, Some(v)) => Ok(v),
            (None, None) => Err(MetricError::NoEyes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eye(points: [(f32, f32); 6]) -> EyeLandmarks {
        EyeLandmarks::new(points.map(|(x, y)| Point2::new(x, y)))
    }

    /// Open eye: width 4, both lid gaps 2 -> EAR = (2+2)/(2*4) = 0.5
    fn open_eye() -> EyeLandmarks {
        eye([
            (0.0, 0.0),
            (1.0, 1.0),
            (3.0, 1.0),
            (4.0, 0.0),
            (3.0, -1.0),
            (1.0, -1.0),
        ])
    }

    /// Fully closed eye: lids coincide, EAR = 0
    fn closed_eye() -> EyeLandmarks {
        eye([
            (0.0, 0.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (3.0, 0.0),
            (1.0, 0.0),
        ])
    }

    #[test]
    fn test_open_eye_ratio() {
        let ear = eye_aspect_ratio(&open_eye()).unwrap();
        assert!((ear - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_closed_eye_ratio_is_zero() {
        assert_eq!(eye_aspect_ratio(&closed_eye()).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_width_is_undefined() {
        // Both corners at the same point
        let degenerate = eye([
            (2.0, 2.0),
            (1.0, 1.0),
            (3.0, 1.0),
            (2.0, 2.0),
            (3.0, -1.0),
            (1.0, -1.0),
        ]);
        assert_eq!(eye_aspect_ratio(&degenerate), Err(MetricError::Undefined));
    }

    #[test]
    fn test_face_openness_averages_both_eyes() {
        let face = FaceLandmarks::new(Some(open_eye()), Some(closed_eye()));
        let openness = face.openness().unwrap();
        assert!((openness - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_face_openness_single_eye_fallback() {
        let face = FaceLandmarks::new(Some(open_eye()), None);
        assert!((face.openness().unwrap() - 0.5).abs() < 1e-6);

        let face = FaceLandmarks::new(None, Some(open_eye()));
        assert!((face.openness().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_face_openness_no_eyes() {
        assert_eq!(FaceLandmarks::default().openness(), Err(MetricError::NoEyes));
    }

    #[test]
    fn test_degenerate_eye_treated_as_absent() {
        let degenerate = eye([
            (1.0, 1.0),
            (1.0, 2.0),
            (1.0, 2.0),
            (1.0, 1.0),
            (1.0, 0.0),
            (1.0, 0.0),
        ]);
        let face = FaceLandmarks::new(Some(degenerate), Some(open_eye()));
        assert!((face.openness().unwrap() - 0.5).abs() < 1e-6);
    }

    proptest! {
        /// EAR is non-negative and finite for any non-degenerate geometry.
        #[test]
        fn prop_ear_non_negative(
            xs in prop::array::uniform6(-1000.0f32..1000.0),
            ys in prop::array::uniform6(-1000.0f32..1000.0),
        ) {
            let mut points = [Point2::default(); 6];
            for i in 0..6 {
                points[i] = Point2::new(xs[i], ys[i]);
            }
            let eye = EyeLandmarks::new(points);
            match eye_aspect_ratio(&eye) {
                Ok(ear) => {
                    prop_assert!(ear >= 0.0);
                    prop_assert!(ear.is_finite());
                }
                Err(e) => prop_assert_eq!(e, MetricError::Undefined),
            }
        }

        /// EAR is invariant under uniform translation of all six points.
        #[test]
        fn prop_ear_translation_invariant(
            dx in -500.0f32..500.0,
            dy in -500.0f32..500.0,
        ) {
            let base = open_eye();
            let shifted = EyeLandmarks::new(
                base.points.map(|p| Point2::new(p.x + dx, p.y + dy)),
            );
            let a = eye_aspect_ratio(&base).unwrap();
            let b = eye_aspect_ratio(&shifted).unwrap();
            prop_assert!((a - b).abs() < 1e-4);
        }
    }
}
