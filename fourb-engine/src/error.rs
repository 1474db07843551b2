//! Error types for the 4B scoring engine

use crate::analysis::calibration::CalibrationError;
use crate::analysis::kinematics::KinematicsError;
use crate::analysis::scoring::ScoringError;
use crate::analysis::sequence::SequenceError;
use thiserror::Error;

/// Engine-level error aggregating the per-analyzer failures
#[derive(Debug, Error)]
pub enum EngineError {
    /// Pose kinematics extraction failed
    #[error("Kinematics error: {0}")]
    Kinematics(#[from] KinematicsError),

    /// Sequence analysis failed
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    /// Session scoring failed
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Athlete calibration failed
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    /// Shared-crate error (config, invalid input, storage)
    #[error("Common error: {0}")]
    Common(#[from] fourb_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
