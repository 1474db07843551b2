//! Shared test fixtures for engine integration tests

// Not every test binary uses every fixture
#![allow(dead_code)]

use fourb_common::landmarks::{Landmark, PoseFrame, PoseLandmark};
use fourb_common::models::SensorReadings;
use fourb_engine::analysis::{Segment, SegmentPeak};
use rand::rngs::StdRng;
use rand::Rng;

/// Route engine tracing through the test harness; safe to call from
/// every test, only the first registration wins
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fourb_engine=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Sensor readings with the given trigger-to-impact time
pub fn sensor(trigger_ms: f64, bat_speed: f64, hand_speed: f64, attack_deg: f64) -> SensorReadings {
    SensorReadings {
        bat_speed_mph: bat_speed,
        hand_speed_mph: hand_speed,
        trigger_to_impact_ms: trigger_ms,
        attack_angle_deg: attack_deg,
        hand_bat_ratio: None,
        pitch_speed_mph: None,
        exit_velocity_mph: None,
    }
}

/// Segment peaks in ideal order with seeded jitter on each interval
///
/// Stands in for upstream per-segment peak detection; the seed keeps
/// every run deterministic.
pub fn jittered_peaks(rng: &mut StdRng, base_interval_ms: f64, jitter_ms: f64) -> Vec<SegmentPeak> {
    let mut time = 0.0;
    Segment::ideal_order()
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            if i > 0 {
                let jitter = if jitter_ms > 0.0 {
                    rng.gen_range(-jitter_ms..=jitter_ms)
                } else {
                    0.0
                };
                time += base_interval_ms + jitter;
            }
            SegmentPeak::new(*seg, time)
        })
        .collect()
}

/// Build a 33-landmark frame whose pelvis and torso lines sit at the
/// given angles (degrees), with uniform visibility
pub fn pose_frame(timestamp_ms: f64, pelvis_deg: f64, torso_deg: f64, visibility: f64) -> PoseFrame {
    let mut landmarks = vec![Landmark::new(0.0, 0.0, 0.0, visibility); 33];

    let place = |angle_deg: f64| -> (Landmark, Landmark) {
        let theta = angle_deg.to_radians();
        let (dx, dy) = (theta.cos() * 0.1, theta.sin() * 0.1);
        (
            Landmark::new(0.5 - dx, 0.5 - dy, 0.0, visibility),
            Landmark::new(0.5 + dx, 0.5 + dy, 0.0, visibility),
        )
    };

    let (lh, rh) = place(pelvis_deg);
    landmarks[PoseLandmark::LeftHip.index()] = lh;
    landmarks[PoseLandmark::RightHip.index()] = rh;
    let (ls, rs) = place(torso_deg);
    landmarks[PoseLandmark::LeftShoulder.index()] = ls;
    landmarks[PoseLandmark::RightShoulder.index()] = rs;

    PoseFrame::new(timestamp_ms, landmarks)
}

/// One raised-cosine rotation over 250 ms, then hold
fn raised_cosine(amplitude: f64, t: f64) -> f64 {
    let omega = 4.0 * std::f64::consts::PI;
    amplitude * (1.0 - (omega * t.clamp(0.0, 0.25)).cos())
}

/// Synthetic swing capture: single pelvis rotation, torso lagging 50 ms
/// behind with a higher amplitude (a well-sequenced swing)
pub fn synthetic_swing_capture(frame_rate: f64, frames: usize) -> Vec<PoseFrame> {
    (0..frames)
        .map(|i| {
            let t = i as f64 / frame_rate;
            let pelvis = raised_cosine(40.0, t);
            let torso = raised_cosine(48.0, t - 0.05);
            pose_frame(t * 1000.0, pelvis, torso, 0.95)
        })
        .collect()
}
