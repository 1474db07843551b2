//! Pose kinematics extraction
//!
//! Converts a per-frame body-landmark sequence into pelvis/torso rotation
//! angles, smoothed angular velocities, and a detected swing window, then
//! summarizes the swing (peaks, stretch rate, consistency, sequencing
//! quality) with a usability gate.
//!
//! Frame indexing is preserved end to end: frames that fail the visibility
//! gate produce zeroed velocity records rather than being dropped, so the
//! window math never sees holes.

use fourb_common::landmarks::{PoseFrame, PoseLandmark};
use fourb_common::models::{ExtractionQuality, KinematicSummary, SequencingQuality};
use fourb_common::params::KinematicsParams;
use thiserror::Error;
use tracing::debug;

/// Minimum frames for one central difference
const MIN_FRAMES: usize = 3;

/// Kinematics extraction errors
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// Pose batch shorter than one central difference needs
    #[error("Pose batch too short: {actual} frames, need at least {required}")]
    TooFewFrames { required: usize, actual: usize },

    /// Non-positive frame rate
    #[error("Invalid frame rate: {0} fps")]
    InvalidFrameRate(f64),
}

/// Per-frame rotation angles derived from hip and shoulder landmarks
#[derive(Debug, Clone, Copy)]
pub struct RotationFrame {
    /// Pelvis line angle (degrees)
    pub pelvis_deg: f64,
    /// Shoulder line angle (degrees)
    pub torso_deg: f64,
    /// Torso-pelvis separation (degrees); zero on invalid frames
    pub x_factor_deg: f64,
    /// Mean visibility of the four landmarks
    pub confidence: f64,
    /// All four landmarks above the visibility threshold
    pub valid: bool,
}

/// Per-frame angular velocities; invalid frames are zeroed, not dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityFrame {
    /// Pelvis angular velocity (deg/s)
    pub pelvis_dps: f64,
    /// Torso angular velocity (deg/s)
    pub torso_dps: f64,
    /// X-factor angular velocity (deg/s)
    pub x_factor_dps: f64,
    /// Central difference had a fully valid neighborhood
    pub valid: bool,
}

/// Active swing located inside a longer capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwingWindow {
    /// First frame above the pelvis velocity threshold
    pub start: usize,
    /// Interpolated stride point (35% of start-to-contact by default)
    pub stride: usize,
    /// Frame of maximum torso velocity after start
    pub contact: usize,
    /// Follow-through end, clamped to the capture
    pub end: usize,
}

/// Complete extraction result
#[derive(Debug, Clone)]
pub struct KinematicsExtraction {
    /// Durable per-swing summary
    pub summary: KinematicSummary,
    /// Detected swing window, absent when no qualifying spike was found
    pub window: Option<SwingWindow>,
}

/// Pose kinematics extractor
pub struct KinematicsExtractor {
    params: KinematicsParams,
}

impl KinematicsExtractor {
    /// Create an extractor with the given parameters
    pub fn new(params: KinematicsParams) -> Self {
        Self { params }
    }

    /// Extract a kinematic summary from an ordered pose capture
    ///
    /// # Arguments
    /// * `frames` - time-ordered pose frames (at least 3)
    /// * `frame_rate` - capture rate in frames per second
    ///
    /// # Errors
    /// Returns `KinematicsError` for batches too short to differentiate or
    /// a non-positive frame rate. Low-confidence input is NOT an error:
    /// the summary comes back with `quality.is_usable = false` and
    /// itemized issues.
    pub fn extract(
        &self,
        frames: &[PoseFrame],
        frame_rate: f64,
    ) -> Result<KinematicsExtraction, KinematicsError> {
        if frames.len() < MIN_FRAMES {
            return Err(KinematicsError::TooFewFrames {
                required: MIN_FRAMES,
                actual: frames.len(),
            });
        }
        if frame_rate <= 0.0 {
            return Err(KinematicsError::InvalidFrameRate(frame_rate));
        }

        let rotations: Vec<RotationFrame> =
            frames.iter().map(|f| self.rotation_frame(f)).collect();
        let raw = self.velocities(&rotations, frame_rate);
        let velocities = self.smooth(&raw);

        let window = self.detect_window(&velocities);
        let (range_start, range_end) = match window {
            Some(w) => (w.start, w.end),
            None => (0, velocities.len() - 1),
        };

        let (peak_pelvis, peak_pelvis_frame) =
            peak_magnitude(&velocities, range_start, range_end, |v| v.pelvis_dps);
        let (peak_torso, peak_torso_frame) =
            peak_magnitude(&velocities, range_start, range_end, |v| v.torso_dps);
        let (stretch_rate, _) =
            peak_magnitude(&velocities, range_start, range_end, |v| v.x_factor_dps);

        let (peak_x_factor, peak_x_factor_frame) =
            peak_separation(&rotations, range_start, range_end);

        let consistency_cv_pct = self.consistency_cv(&velocities, range_start, range_end);
        let sequencing_quality = self.sequencing_quality(
            peak_pelvis,
            peak_pelvis_frame,
            peak_torso,
            peak_torso_frame,
        );
        let quality = self.quality_gate(&rotations, &velocities, window.is_some());

        debug!(
            frames = frames.len(),
            window = ?window,
            peak_pelvis_dps = peak_pelvis,
            peak_torso_dps = peak_torso,
            usable = quality.is_usable,
            "Kinematics extraction complete"
        );

        Ok(KinematicsExtraction {
            summary: KinematicSummary {
                peak_pelvis_velocity_dps: peak_pelvis,
                peak_pelvis_frame,
                peak_torso_velocity_dps: peak_torso,
                peak_torso_frame,
                peak_x_factor_deg: peak_x_factor,
                peak_x_factor_frame,
                stretch_rate_dps: stretch_rate,
                consistency_cv_pct,
                sequencing_quality,
                quality,
            },
            window,
        })
    }

    /// Derive rotation angles and the validity flag for one frame
    fn rotation_frame(&self, frame: &PoseFrame) -> RotationFrame {
        let left_hip = frame.landmark(PoseLandmark::LeftHip);
        let right_hip = frame.landmark(PoseLandmark::RightHip);
        let left_shoulder = frame.landmark(PoseLandmark::LeftShoulder);
        let right_shoulder = frame.landmark(PoseLandmark::RightShoulder);

        let (Some(lh), Some(rh), Some(ls), Some(rs)) =
            (left_hip, right_hip, left_shoulder, right_shoulder)
        else {
            // Frame does not carry the full schema
            return RotationFrame {
                pelvis_deg: 0.0,
                torso_deg: 0.0,
                x_factor_deg: 0.0,
                confidence: 0.0,
                valid: false,
            };
        };

        let threshold = self.params.visibility_threshold;
        let valid = lh.is_visible(threshold)
            && rh.is_visible(threshold)
            && ls.is_visible(threshold)
            && rs.is_visible(threshold);
        let confidence =
            (lh.visibility + rh.visibility + ls.visibility + rs.visibility) / 4.0;

        let pelvis_deg = (rh.y - lh.y).atan2(rh.x - lh.x).to_degrees();
        let torso_deg = (rs.y - ls.y).atan2(rs.x - ls.x).to_degrees();
        let x_factor_deg = if valid { torso_deg - pelvis_deg } else { 0.0 };

        RotationFrame {
            pelvis_deg,
            torso_deg,
            x_factor_deg,
            confidence,
            valid,
        }
    }

    /// Central-difference angular velocities over 2·Δt
    ///
    /// A velocity frame is valid only when frames i−1, i, i+1 are all valid
    /// rotation frames; boundary frames and broken neighborhoods come back
    /// zeroed so downstream indexing stays aligned with the capture.
    fn velocities(&self, rotations: &[RotationFrame], frame_rate: f64) -> Vec<VelocityFrame> {
        let dt = 1.0 / frame_rate;
        let mut out = vec![VelocityFrame::default(); rotations.len()];

        for i in 1..rotations.len() - 1 {
            let (prev, curr, next) = (rotations[i - 1], rotations[i], rotations[i + 1]);
            if !(prev.valid && curr.valid && next.valid) {
                continue;
            }

            out[i] = VelocityFrame {
                pelvis_dps: wrap_degrees(next.pelvis_deg - prev.pelvis_deg) / (2.0 * dt),
                torso_dps: wrap_degrees(next.torso_deg - prev.torso_deg) / (2.0 * dt),
                x_factor_dps: wrap_degrees(next.x_factor_deg - prev.x_factor_deg) / (2.0 * dt),
                valid: true,
            };
        }

        out
    }

    /// Centered moving-average smoothing, clipped at sequence boundaries
    fn smooth(&self, raw: &[VelocityFrame]) -> Vec<VelocityFrame> {
        let half = self.params.smoothing_window / 2;
        let mut out = Vec::with_capacity(raw.len());

        for i in 0..raw.len() {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(raw.len() - 1);
            let span = (hi - lo + 1) as f64;

            let mut pelvis = 0.0;
            let mut torso = 0.0;
            let mut x_factor = 0.0;
            for v in &raw[lo..=hi] {
                pelvis += v.pelvis_dps;
                torso += v.torso_dps;
                x_factor += v.x_factor_dps;
            }

            out.push(VelocityFrame {
                pelvis_dps: pelvis / span,
                torso_dps: torso / span,
                x_factor_dps: x_factor / span,
                valid: raw[i].valid,
            });
        }

        out
    }

    /// Locate the active swing window from smoothed pelvis velocity
    fn detect_window(&self, velocities: &[VelocityFrame]) -> Option<SwingWindow> {
        let start = velocities
            .iter()
            .position(|v| v.pelvis_dps.abs() > self.params.pelvis_velocity_threshold_dps)?;

        let horizon = (start + self.params.contact_horizon_frames).min(velocities.len() - 1);
        let mut contact = start;
        let mut best = f64::MIN;
        for (i, v) in velocities.iter().enumerate().take(horizon + 1).skip(start) {
            if v.torso_dps.abs() > best {
                best = v.torso_dps.abs();
                contact = i;
            }
        }

        let span = contact - start;
        if span < self.params.min_swing_span_frames {
            return None;
        }

        let stride = start + (span as f64 * self.params.stride_fraction).round() as usize;
        let end = (contact + self.params.follow_through_frames).min(velocities.len() - 1);

        Some(SwingWindow {
            start,
            stride,
            contact,
            end,
        })
    }

    /// Coefficient of variation of active pelvis velocity, as a percentage
    ///
    /// Samples below the noise floor are idle posture, not swing motion,
    /// and would swamp the statistic.
    fn consistency_cv(&self, velocities: &[VelocityFrame], start: usize, end: usize) -> f64 {
        let active: Vec<f64> = velocities[start..=end]
            .iter()
            .map(|v| v.pelvis_dps.abs())
            .filter(|m| *m > self.params.velocity_noise_floor_dps)
            .collect();

        if active.is_empty() {
            return 0.0;
        }

        let mean = active.iter().sum::<f64>() / active.len() as f64;
        if mean <= f64::EPSILON {
            return 0.0;
        }
        let variance =
            active.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / active.len() as f64;

        variance.sqrt() / mean * 100.0
    }

    /// Classify kinetic-chain quality from pelvis/torso peak ordering
    fn sequencing_quality(
        &self,
        peak_pelvis: f64,
        peak_pelvis_frame: usize,
        peak_torso: f64,
        peak_torso_frame: usize,
    ) -> SequencingQuality {
        let gap = peak_torso_frame as i64 - peak_pelvis_frame as i64;
        let ratio = if peak_pelvis > 0.0 {
            peak_torso / peak_pelvis
        } else {
            0.0
        };

        if gap >= self.params.good_gap_frames && ratio > self.params.good_velocity_ratio {
            SequencingQuality::Good
        } else if gap >= 0 && ratio >= self.params.average_velocity_ratio {
            SequencingQuality::Average
        } else {
            SequencingQuality::Poor
        }
    }

    /// Usability gate: enough valid frames AND a detected window
    fn quality_gate(
        &self,
        rotations: &[RotationFrame],
        velocities: &[VelocityFrame],
        window_found: bool,
    ) -> ExtractionQuality {
        let valid_frames = rotations.iter().filter(|r| r.valid).count();
        let valid_ratio = valid_frames as f64 / rotations.len() as f64;

        let mut issues = Vec::new();
        if valid_ratio < self.params.min_valid_frame_ratio {
            issues.push(format!(
                "low detection rate: {:.0}% of frames had visible hips and shoulders",
                valid_ratio * 100.0
            ));
        }
        if !window_found {
            let peak = velocities
                .iter()
                .map(|v| v.pelvis_dps.abs())
                .fold(0.0_f64, f64::max);
            if peak <= self.params.pelvis_velocity_threshold_dps {
                issues.push(format!(
                    "low pelvis velocity: peak {:.0} deg/s never crossed {:.0} deg/s",
                    peak, self.params.pelvis_velocity_threshold_dps
                ));
            } else {
                issues.push("no swing detected: rotation spike too brief to analyze".to_string());
            }
        }

        ExtractionQuality {
            is_usable: valid_ratio >= self.params.min_valid_frame_ratio && window_found,
            issues,
            valid_frame_pct: valid_ratio * 100.0,
        }
    }
}

impl Default for KinematicsExtractor {
    fn default() -> Self {
        Self::new(KinematicsParams::default())
    }
}

/// Largest magnitude of a velocity component over an inclusive frame range
fn peak_magnitude<F>(
    velocities: &[VelocityFrame],
    start: usize,
    end: usize,
    component: F,
) -> (f64, usize)
where
    F: Fn(&VelocityFrame) -> f64,
{
    let mut peak = 0.0;
    let mut frame = start;
    for (i, v) in velocities.iter().enumerate().take(end + 1).skip(start) {
        let magnitude = component(v).abs();
        if magnitude > peak {
            peak = magnitude;
            frame = i;
        }
    }
    (peak, frame)
}

/// Largest X-factor separation over an inclusive frame range
fn peak_separation(rotations: &[RotationFrame], start: usize, end: usize) -> (f64, usize) {
    let mut peak = 0.0;
    let mut frame = start;
    for (i, r) in rotations.iter().enumerate().take(end + 1).skip(start) {
        let magnitude = r.x_factor_deg.abs();
        if magnitude > peak {
            peak = magnitude;
            frame = i;
        }
    }
    (peak, frame)
}

/// Shortest-arc angular difference in degrees
fn wrap_degrees(delta: f64) -> f64 {
    let mut d = delta % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}
