//! Engine tuning parameters
//!
//! Every threshold the analyzers consult lives here so deployments can
//! override them from the TOML config without a rebuild. Defaults match
//! the calibrated production values.

use serde::{Deserialize, Serialize};

/// Pose kinematics extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsParams {
    /// Minimum landmark visibility for a frame to count as valid (default: 0.5)
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,

    /// Centered moving-average window for velocity smoothing, frames (default: 3)
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Pelvis angular velocity that opens a swing window, deg/s (default: 200.0)
    #[serde(default = "default_pelvis_velocity_threshold")]
    pub pelvis_velocity_threshold_dps: f64,

    /// How far past the window start to search for contact, frames (default: 60)
    #[serde(default = "default_contact_horizon")]
    pub contact_horizon_frames: usize,

    /// Minimum start-to-contact span for an analyzable swing, frames (default: 10)
    #[serde(default = "default_min_swing_span")]
    pub min_swing_span_frames: usize,

    /// Follow-through kept after contact, frames (default: 10)
    #[serde(default = "default_follow_through")]
    pub follow_through_frames: usize,

    /// Stride point as a fraction of the start-to-contact span (default: 0.35)
    #[serde(default = "default_stride_fraction")]
    pub stride_fraction: f64,

    /// Minimum valid-frame fraction for a usable extraction (default: 0.5)
    #[serde(default = "default_min_valid_frame_ratio")]
    pub min_valid_frame_ratio: f64,

    /// Pelvis velocity noise floor for the consistency CV, deg/s (default: 50.0)
    #[serde(default = "default_velocity_noise_floor")]
    pub velocity_noise_floor_dps: f64,

    /// Torso-after-pelvis peak gap for Good sequencing, frames (default: 2)
    #[serde(default = "default_good_gap_frames")]
    pub good_gap_frames: i64,

    /// Torso:pelvis peak velocity ratio for Good sequencing (default: 1.0)
    #[serde(default = "default_good_velocity_ratio")]
    pub good_velocity_ratio: f64,

    /// Torso:pelvis peak velocity ratio floor for Average sequencing (default: 0.9)
    #[serde(default = "default_average_velocity_ratio")]
    pub average_velocity_ratio: f64,
}

/// Kinetic-chain sequence scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceParams {
    /// Weight of the ordering score in the combined score (default: 0.7)
    #[serde(default = "default_order_weight")]
    pub order_weight: f64,

    /// Weight of the timing score in the combined score (default: 0.3)
    #[serde(default = "default_timing_weight")]
    pub timing_weight: f64,

    /// Points deducted per unit of interval CV (default: 50.0)
    #[serde(default = "default_timing_cv_penalty")]
    pub timing_cv_penalty: f64,
}

/// Composite 4B scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Lower clamp for every category score (default: 20.0)
    #[serde(default = "default_score_floor")]
    pub score_floor: f64,

    /// Upper clamp for every category score (default: 80.0)
    #[serde(default = "default_score_ceiling")]
    pub score_ceiling: f64,

    /// Brain score base before the CV penalty (default: 80.0)
    #[serde(default = "default_brain_base")]
    pub brain_base: f64,

    /// Brain score penalty per trigger-to-impact CV percent (default: 2.5)
    #[serde(default = "default_brain_cv_penalty")]
    pub brain_cv_penalty: f64,

    /// Trigger-to-impact CV percent that flags a timing leak (default: 12.0)
    #[serde(default = "default_timing_leak_cv_pct")]
    pub timing_leak_cv_pct: f64,

    /// Mean hand:bat ratio below which a power leak is flagged (default: 0.85)
    #[serde(default = "default_power_leak_ratio")]
    pub power_leak_ratio: f64,

    /// Bat score base before the attack-angle dispersion penalty (default: 70.0)
    #[serde(default = "default_bat_base")]
    pub bat_base: f64,

    /// Bat speed factor in the projected exit velocity heuristic (default: 1.2)
    #[serde(default = "default_bat_speed_factor")]
    pub bat_speed_factor: f64,

    /// Pitch speed factor in the projected exit velocity heuristic (default: 0.2)
    #[serde(default = "default_pitch_speed_factor")]
    pub pitch_speed_factor: f64,

    /// Ball score per mph of exit velocity (default: 0.75)
    #[serde(default = "default_exit_velocity_score_factor")]
    pub exit_velocity_score_factor: f64,

    /// Pitch speed assumed when the caller supplies none, mph (default: 40.0)
    #[serde(default = "default_pitch_speed_mph")]
    pub default_pitch_speed_mph: f64,
}

/// Athlete regression calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationParams {
    /// Minimum historical swings required to fit a model (default: 5)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Days until a calibrated model expires (default: 90)
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,

    /// R-squared above which a model reads as Strong (default: 0.7)
    #[serde(default = "default_strong_r_squared")]
    pub strong_r_squared: f64,

    /// R-squared above which a model reads as Moderate (default: 0.4)
    #[serde(default = "default_moderate_r_squared")]
    pub moderate_r_squared: f64,
}

/// Complete engine parameter set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineParams {
    /// Pose kinematics extraction
    #[serde(default)]
    pub kinematics: KinematicsParams,

    /// Kinetic-chain sequence scoring
    #[serde(default)]
    pub sequence: SequenceParams,

    /// Composite 4B scoring
    #[serde(default)]
    pub scoring: ScoringParams,

    /// Athlete regression calibration
    #[serde(default)]
    pub calibration: CalibrationParams,
}

// Default value functions
fn default_visibility_threshold() -> f64 {
    0.5
}

fn default_smoothing_window() -> usize {
    3
}

fn default_pelvis_velocity_threshold() -> f64 {
    200.0
}

fn default_contact_horizon() -> usize {
    60
}

fn default_min_swing_span() -> usize {
    10
}

fn default_follow_through() -> usize {
    10
}

fn default_stride_fraction() -> f64 {
    0.35
}

fn default_min_valid_frame_ratio() -> f64 {
    0.5
}

fn default_velocity_noise_floor() -> f64 {
    50.0
}

fn default_good_gap_frames() -> i64 {
    2
}

fn default_good_velocity_ratio() -> f64 {
    1.0
}

fn default_average_velocity_ratio() -> f64 {
    0.9
}

fn default_order_weight() -> f64 {
    0.7
}

fn default_timing_weight() -> f64 {
    0.3
}

fn default_timing_cv_penalty() -> f64 {
    50.0
}

fn default_score_floor() -> f64 {
    20.0
}

fn default_score_ceiling() -> f64 {
    80.0
}

fn default_brain_base() -> f64 {
    80.0
}

fn default_brain_cv_penalty() -> f64 {
    2.5
}

fn default_timing_leak_cv_pct() -> f64 {
    12.0
}

fn default_power_leak_ratio() -> f64 {
    0.85
}

fn default_bat_base() -> f64 {
    70.0
}

fn default_bat_speed_factor() -> f64 {
    1.2
}

fn default_pitch_speed_factor() -> f64 {
    0.2
}

fn default_exit_velocity_score_factor() -> f64 {
    0.75
}

fn default_pitch_speed_mph() -> f64 {
    40.0
}

fn default_min_samples() -> usize {
    5
}

fn default_expiry_days() -> i64 {
    90
}

fn default_strong_r_squared() -> f64 {
    0.7
}

fn default_moderate_r_squared() -> f64 {
    0.4
}

impl Default for KinematicsParams {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility_threshold(),
            smoothing_window: default_smoothing_window(),
            pelvis_velocity_threshold_dps: default_pelvis_velocity_threshold(),
            contact_horizon_frames: default_contact_horizon(),
            min_swing_span_frames: default_min_swing_span(),
            follow_through_frames: default_follow_through(),
            stride_fraction: default_stride_fraction(),
            min_valid_frame_ratio: default_min_valid_frame_ratio(),
            velocity_noise_floor_dps: default_velocity_noise_floor(),
            good_gap_frames: default_good_gap_frames(),
            good_velocity_ratio: default_good_velocity_ratio(),
            average_velocity_ratio: default_average_velocity_ratio(),
        }
    }
}

impl Default for SequenceParams {
    fn default() -> Self {
        Self {
            order_weight: default_order_weight(),
            timing_weight: default_timing_weight(),
            timing_cv_penalty: default_timing_cv_penalty(),
        }
    }
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            score_floor: default_score_floor(),
            score_ceiling: default_score_ceiling(),
            brain_base: default_brain_base(),
            brain_cv_penalty: default_brain_cv_penalty(),
            timing_leak_cv_pct: default_timing_leak_cv_pct(),
            power_leak_ratio: default_power_leak_ratio(),
            bat_base: default_bat_base(),
            bat_speed_factor: default_bat_speed_factor(),
            pitch_speed_factor: default_pitch_speed_factor(),
            exit_velocity_score_factor: default_exit_velocity_score_factor(),
            default_pitch_speed_mph: default_pitch_speed_mph(),
        }
    }
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            expiry_days: default_expiry_days(),
            strong_r_squared: default_strong_r_squared(),
            moderate_r_squared: default_moderate_r_squared(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_calibrated_values() {
        let params = EngineParams::default();
        assert_eq!(params.kinematics.smoothing_window, 3);
        assert_eq!(params.kinematics.pelvis_velocity_threshold_dps, 200.0);
        assert_eq!(params.kinematics.min_swing_span_frames, 10);
        assert_eq!(params.scoring.score_floor, 20.0);
        assert_eq!(params.scoring.score_ceiling, 80.0);
        assert_eq!(params.calibration.min_samples, 5);
        assert_eq!(params.calibration.expiry_days, 90);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let source = r#"
            [kinematics]
            pelvis_velocity_threshold_dps = 180.0
        "#;
        let params: EngineParams = toml::from_str(source).unwrap();
        assert_eq!(params.kinematics.pelvis_velocity_threshold_dps, 180.0);
        // Untouched fields keep their defaults
        assert_eq!(params.kinematics.smoothing_window, 3);
        assert_eq!(params.scoring.brain_cv_penalty, 2.5);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let params: EngineParams = toml::from_str("").unwrap();
        assert_eq!(params.sequence.order_weight, 0.7);
        assert_eq!(params.sequence.timing_weight, 0.3);
    }
}
