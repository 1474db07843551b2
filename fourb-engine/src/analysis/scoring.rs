//! Composite 4B session scoring
//!
//! Aggregates a session's swings into the four category scores (Brain,
//! Body, Bat, Ball), a composite, a weakest-link diagnosis, and leak
//! flags. Every category score is clamped to the 20-80 band so a single
//! degenerate session cannot run a player off the scale.

use fourb_common::models::{
    Category, LeakTag, ScoreConfidence, SensorReadings, SessionScores, Swing,
};
use fourb_common::params::ScoringParams;
use fourb_common::time;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Scoring errors
#[derive(Debug, Error)]
pub enum ScoringError {
    /// No swings supplied
    #[error("Empty swing set: nothing to score")]
    EmptySession,

    /// A category has no usable samples
    #[error("Insufficient data: no swing carried {field} ({swings} swings in session)")]
    MissingMeasurements {
        /// Which measurement was absent
        field: &'static str,
        /// How many swings the session held
        swings: usize,
    },
}

/// Composite 4B scorer
pub struct SessionScorer {
    params: ScoringParams,
}

impl SessionScorer {
    /// Create a scorer with the given parameters
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Score one session's swings
    ///
    /// # Arguments
    /// * `session_id` - session identity stamped into the result
    /// * `swings` - the session's swing records
    ///
    /// # Errors
    /// Returns `ScoringError::EmptySession` for an empty batch and
    /// `ScoringError::MissingMeasurements` when no swing carries the
    /// sensor fields a category needs.
    pub fn score_session(
        &self,
        session_id: Uuid,
        swings: &[Swing],
    ) -> Result<SessionScores, ScoringError> {
        if swings.is_empty() {
            return Err(ScoringError::EmptySession);
        }

        let sensors: Vec<&SensorReadings> =
            swings.iter().filter_map(|s| s.sensor.as_ref()).collect();
        if sensors.is_empty() {
            return Err(ScoringError::MissingMeasurements {
                field: "bat sensor readings",
                swings: swings.len(),
            });
        }

        let mut leaks = Vec::new();

        let brain = self.brain_score(&sensors, &mut leaks);
        let body = self.body_score(&sensors, swings.len(), &mut leaks)?;
        let bat = self.bat_score(&sensors);
        let (ball, confidence) = self.ball_score(&sensors);

        let composite = ((brain + body + bat + ball) / 4.0).round();
        let weakest_link = weakest_of(brain, body, bat, ball);

        debug!(
            %session_id,
            brain, body, bat, ball, composite,
            weakest = weakest_link.as_str(),
            confidence = confidence.as_str(),
            "Session scoring complete"
        );

        Ok(SessionScores {
            session_id,
            brain,
            body,
            bat,
            ball,
            composite,
            weakest_link,
            leaks,
            confidence,
            swing_count: swings.len(),
            computed_at: time::now(),
        })
    }

    /// Brain: trigger-to-impact consistency
    fn brain_score(&self, sensors: &[&SensorReadings], leaks: &mut Vec<LeakTag>) -> f64 {
        let times: Vec<f64> = sensors.iter().map(|s| s.trigger_to_impact_ms).collect();
        let cv_pct = cv_percent(&times);

        if cv_pct > self.params.timing_leak_cv_pct {
            leaks.push(LeakTag::TimingLeak);
        }

        self.clamp(self.params.brain_base - self.params.brain_cv_penalty * cv_pct)
    }

    /// Body: hand-to-barrel energy transfer
    fn body_score(
        &self,
        sensors: &[&SensorReadings],
        swing_count: usize,
        leaks: &mut Vec<LeakTag>,
    ) -> Result<f64, ScoringError> {
        let ratios: Vec<f64> = sensors
            .iter()
            .filter_map(|s| s.effective_hand_bat_ratio())
            .collect();
        if ratios.is_empty() {
            return Err(ScoringError::MissingMeasurements {
                field: "hand:bat speed ratio",
                swings: swing_count,
            });
        }

        let mean_ratio = mean(&ratios);
        if mean_ratio < self.params.power_leak_ratio {
            leaks.push(LeakTag::PowerLeak);
        }

        Ok(self.clamp(mean_ratio * 100.0))
    }

    /// Bat: barrel control from attack-angle dispersion
    fn bat_score(&self, sensors: &[&SensorReadings]) -> f64 {
        let angles: Vec<f64> = sensors.iter().map(|s| s.attack_angle_deg).collect();
        self.clamp(self.params.bat_base - std_dev(&angles))
    }

    /// Ball: measured exit velocity, or the ghost-recovery projection
    fn ball_score(&self, sensors: &[&SensorReadings]) -> (f64, ScoreConfidence) {
        let measured: Vec<f64> = sensors
            .iter()
            .filter_map(|s| s.exit_velocity_mph)
            .collect();
        if !measured.is_empty() {
            let ev = mean(&measured);
            return (
                self.clamp(ev * self.params.exit_velocity_score_factor),
                ScoreConfidence::Measured,
            );
        }

        // Ghost recovery: no ball-flight data, project exit velocity from
        // bat speed and the pitch-speed estimate
        let bat_speed = mean(&sensors.iter().map(|s| s.bat_speed_mph).collect::<Vec<_>>());
        let pitches: Vec<f64> = sensors.iter().filter_map(|s| s.pitch_speed_mph).collect();
        let pitch_speed = if pitches.is_empty() {
            self.params.default_pitch_speed_mph
        } else {
            mean(&pitches)
        };

        let projected = bat_speed * self.params.bat_speed_factor
            + pitch_speed * self.params.pitch_speed_factor;

        (
            self.clamp(projected * self.params.exit_velocity_score_factor),
            ScoreConfidence::Estimated,
        )
    }

    fn clamp(&self, score: f64) -> f64 {
        score.clamp(self.params.score_floor, self.params.score_ceiling)
    }
}

impl Default for SessionScorer {
    fn default() -> Self {
        Self::new(ScoringParams::default())
    }
}

/// Lowest category, ties broken by declaration precedence
fn weakest_of(brain: f64, body: f64, bat: f64, ball: f64) -> Category {
    let scores = [brain, body, bat, ball];
    let mut weakest = Category::Brain;
    let mut lowest = scores[0];
    for (category, score) in Category::all().into_iter().zip(scores) {
        if score < lowest {
            lowest = score;
            weakest = category;
        }
    }
    weakest
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation as a percentage; zero for degenerate means
fn cv_percent(values: &[f64]) -> f64 {
    let m = mean(values);
    if m <= f64::EPSILON {
        return 0.0;
    }
    std_dev(values) / m * 100.0
}
