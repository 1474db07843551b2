//! Per-swing records: sensor readings and derived kinematics

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorical kinetic-chain quality derived from pelvis/torso peak timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencingQuality {
    /// Torso peaks clearly after pelvis and outruns it
    Good,
    /// Torso peaks with pelvis or only slightly faster
    Average,
    /// Torso leads the pelvis or never catches up
    Poor,
}

impl SequencingQuality {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SequencingQuality::Good => "good",
            SequencingQuality::Average => "average",
            SequencingQuality::Poor => "poor",
        }
    }
}

/// Usability gate for a pose extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionQuality {
    /// Whether the extraction is authoritative
    pub is_usable: bool,

    /// Itemized problems when it is not
    pub issues: Vec<String>,

    /// Fraction of frames passing the visibility gate (0.0-1.0)
    pub valid_frame_pct: f64,
}

/// Kinematic summary of one swing, derived from a pose capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicSummary {
    /// Peak pelvis angular velocity magnitude (deg/s)
    pub peak_pelvis_velocity_dps: f64,

    /// Frame index of the pelvis velocity peak
    pub peak_pelvis_frame: usize,

    /// Peak torso angular velocity magnitude (deg/s)
    pub peak_torso_velocity_dps: f64,

    /// Frame index of the torso velocity peak
    pub peak_torso_frame: usize,

    /// Peak torso-pelvis separation (degrees)
    pub peak_x_factor_deg: f64,

    /// Frame index of the X-factor peak
    pub peak_x_factor_frame: usize,

    /// Peak X-factor angular velocity magnitude (deg/s)
    pub stretch_rate_dps: f64,

    /// Coefficient of variation of active pelvis velocity (percent)
    pub consistency_cv_pct: f64,

    /// Categorical kinetic-chain quality
    pub sequencing_quality: SequencingQuality,

    /// Usability gate and itemized issues
    pub quality: ExtractionQuality,
}

/// Raw bat-sensor readings for one swing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReadings {
    /// Barrel speed at impact (mph)
    pub bat_speed_mph: f64,

    /// Hand speed at impact (mph)
    pub hand_speed_mph: f64,

    /// Trigger-to-impact time (ms)
    pub trigger_to_impact_ms: f64,

    /// Attack angle at contact (degrees)
    pub attack_angle_deg: f64,

    /// Sensor-reported hand:bat speed ratio, when the device supplies one
    pub hand_bat_ratio: Option<f64>,

    /// Caller-supplied pitch speed estimate (mph)
    pub pitch_speed_mph: Option<f64>,

    /// Measured exit velocity from ball-flight capture (mph)
    pub exit_velocity_mph: Option<f64>,
}

impl SensorReadings {
    /// Hand:bat ratio, falling back to the derived quotient
    pub fn effective_hand_bat_ratio(&self) -> Option<f64> {
        if let Some(ratio) = self.hand_bat_ratio {
            return Some(ratio);
        }
        if self.bat_speed_mph > 0.0 {
            Some(self.hand_speed_mph / self.bat_speed_mph)
        } else {
            None
        }
    }
}

/// One recorded swing event
///
/// Carries raw sensor fields and/or a derived kinematic summary; either
/// half may be absent depending on the capture hardware present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swing {
    /// Swing identity
    pub id: Uuid,

    /// Bat-sensor readings, when a sensor was attached
    pub sensor: Option<SensorReadings>,

    /// Pose-derived kinematics, when camera capture ran
    pub kinematics: Option<KinematicSummary>,

    /// Combined kinetic-chain sequence score (0-100), when peaks were captured
    pub sequence_score: Option<u8>,
}

impl Swing {
    /// Create an empty swing record
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            sensor: None,
            kinematics: None,
            sequence_score: None,
        }
    }

    /// Create a swing from sensor readings
    pub fn from_sensor(id: Uuid, sensor: SensorReadings) -> Self {
        Self {
            id,
            sensor: Some(sensor),
            kinematics: None,
            sequence_score: None,
        }
    }
}
