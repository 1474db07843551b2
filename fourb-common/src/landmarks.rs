//! Body landmark schema for pose input
//!
//! Pose batches arrive from client-side pose detection using the fixed
//! 33-point BlazePose layout. The engine only addresses the hip and
//! shoulder landmarks; the enum pins their indices so callers and the
//! extractor agree on the schema.

use serde::{Deserialize, Serialize};

/// A single detected body landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (image-normalized)
    pub x: f64,
    /// Vertical position (image-normalized)
    pub y: f64,
    /// Depth relative to the hip midpoint
    pub z: f64,
    /// Detection visibility (0.0-1.0)
    pub visibility: f64,
}

impl Landmark {
    /// Create a new landmark
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// Whether the landmark clears the given visibility threshold
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }
}

/// Landmark indices used by the engine (BlazePose 33-point schema)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseLandmark {
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftHip = 23,
    RightHip = 24,
}

impl PoseLandmark {
    /// Index into a pose frame's landmark array
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Landmark name
    pub fn name(&self) -> &'static str {
        match self {
            PoseLandmark::LeftShoulder => "left_shoulder",
            PoseLandmark::RightShoulder => "right_shoulder",
            PoseLandmark::LeftHip => "left_hip",
            PoseLandmark::RightHip => "right_hip",
        }
    }

    /// All landmarks the engine reads
    pub fn all() -> [Self; 4] {
        [
            PoseLandmark::LeftShoulder,
            PoseLandmark::RightShoulder,
            PoseLandmark::LeftHip,
            PoseLandmark::RightHip,
        ]
    }
}

/// One frame of a pose capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture timestamp in milliseconds
    pub timestamp_ms: f64,
    /// Ordered landmark positions (BlazePose indexing)
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    /// Create a new pose frame
    pub fn new(timestamp_ms: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    /// Look up a named landmark, if the frame carries it
    pub fn landmark(&self, which: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(which.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices_follow_blazepose() {
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::RightShoulder.index(), 12);
        assert_eq!(PoseLandmark::LeftHip.index(), 23);
        assert_eq!(PoseLandmark::RightHip.index(), 24);
    }

    #[test]
    fn test_visibility_threshold() {
        let lm = Landmark::new(0.5, 0.5, 0.0, 0.6);
        assert!(lm.is_visible(0.5));
        assert!(!lm.is_visible(0.7));
    }

    #[test]
    fn test_frame_landmark_lookup() {
        let mut landmarks = vec![Landmark::new(0.0, 0.0, 0.0, 0.0); 33];
        landmarks[PoseLandmark::LeftHip.index()] = Landmark::new(0.4, 0.6, 0.0, 0.9);

        let frame = PoseFrame::new(0.0, landmarks);
        let hip = frame.landmark(PoseLandmark::LeftHip).unwrap();
        assert!((hip.visibility - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_frame_returns_none() {
        let frame = PoseFrame::new(0.0, vec![Landmark::new(0.0, 0.0, 0.0, 1.0); 5]);
        assert!(frame.landmark(PoseLandmark::LeftShoulder).is_none());
    }
}
