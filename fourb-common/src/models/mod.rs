//! Durable domain records exchanged with storage collaborators

pub mod athlete;
pub mod scores;
pub mod swing;

pub use athlete::{AthleteModel, ModelQuality};
pub use scores::{Category, LeakTag, ScoreConfidence, SessionScores};
pub use swing::{ExtractionQuality, KinematicSummary, SensorReadings, SequencingQuality, Swing};
