//! Analysis services: the four stages of the 4B scoring pipeline

pub mod calibration;
pub mod kinematics;
pub mod scoring;
pub mod sequence;

pub use calibration::{CalibrationError, CalibrationSample, Calibrator};
pub use kinematics::{KinematicsError, KinematicsExtraction, KinematicsExtractor, SwingWindow};
pub use scoring::{ScoringError, SessionScorer};
pub use sequence::{
    Segment, SegmentPeak, SequenceAnalysis, SequenceAnalyzer, SequenceError,
};
