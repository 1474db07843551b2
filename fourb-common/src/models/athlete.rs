//! Per-athlete predictive model record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fit-quality band for a calibrated model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelQuality {
    /// R-squared above the strong threshold
    Strong,
    /// R-squared above the moderate threshold
    Moderate,
    /// Anything below
    Weak,
}

impl ModelQuality {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelQuality::Strong => "Strong",
            ModelQuality::Moderate => "Moderate",
            ModelQuality::Weak => "Weak",
        }
    }
}

/// Personalized linear model relating 4B sub-scores to bat speed
///
/// One live model per athlete: recalibration overwrites in place. Never
/// persisted below the calibration minimum sample count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteModel {
    /// Athlete identity (upsert key)
    pub athlete_id: Uuid,

    /// Intercept followed by one coefficient per category
    /// (brain, body, bat, ball)
    pub coefficients: [f64; 5],

    /// Goodness of fit, clamped to [0, 1]
    pub r_squared: f64,

    /// Fit-quality band derived from r_squared
    pub quality: ModelQuality,

    /// Number of historical swings behind the fit
    pub sample_count: usize,

    /// When the model was calibrated
    pub calibrated_at: DateTime<Utc>,

    /// When the model stops being trusted
    pub expires_at: DateTime<Utc>,

    /// Plain-language reading of each coefficient
    pub interpretation: Vec<String>,
}

impl AthleteModel {
    /// Predicted bat speed for a set of sub-scores
    pub fn predict(&self, brain: f64, body: f64, bat: f64, ball: f64) -> f64 {
        self.coefficients[0]
            + self.coefficients[1] * brain
            + self.coefficients[2] * body
            + self.coefficients[3] * bat
            + self.coefficients[4] * ball
    }

    /// Whether the model has passed its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
