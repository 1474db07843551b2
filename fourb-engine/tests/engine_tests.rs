//! End-to-end engine tests
//!
//! Drives the full pipeline the way the product backend does: raw swing
//! telemetry in, session scores and athlete models out, with the storage
//! collaborator played by the in-memory store.

mod helpers;

use fourb_engine::analysis::{CalibrationSample, SequenceAnalyzer};
use fourb_engine::pipeline::{PipelineConfig, PoseCapture, SessionPipeline, SwingInput};
use fourb_engine::store::{AthleteModelStore, MemoryStore, SessionScoreStore};
use fourb_common::models::{Category, LeakTag, ModelQuality, ScoreConfidence};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn sensor_inputs(triggers: &[f64]) -> Vec<SwingInput> {
    triggers
        .iter()
        .map(|t| SwingInput::from_sensor(Uuid::new_v4(), helpers::sensor(*t, 70.0, 63.0, 10.0)))
        .collect()
}

#[test]
fn test_steady_session_scores_brain_80_without_leak() {
    // Given: 10 swings with a constant 150 ms trigger-to-impact
    let pipeline = SessionPipeline::new(PipelineConfig::default());
    let inputs = sensor_inputs(&[150.0; 10]);

    // When: the session is analyzed
    let outcome = pipeline
        .analyze_session(Uuid::new_v4(), &inputs, false)
        .unwrap();

    // Then: zero timing variance scores a full Brain with no leak
    assert_eq!(outcome.scores.brain, 80.0);
    assert!(!outcome.scores.has_leak(LeakTag::TimingLeak));
}

#[test]
fn test_erratic_timing_collapses_brain_and_flags_leak() {
    let pipeline = SessionPipeline::new(PipelineConfig::default());
    let triggers: Vec<f64> = (0..10)
        .map(|i| if i % 2 == 0 { 100.0 } else { 200.0 })
        .collect();

    let outcome = pipeline
        .analyze_session(Uuid::new_v4(), &sensor_inputs(&triggers), false)
        .unwrap();

    assert!(
        outcome.scores.brain < 50.0,
        "alternating 100/200 ms must score materially below the steady 80"
    );
    assert!(outcome.scores.has_leak(LeakTag::TimingLeak));
}

#[test]
fn test_full_telemetry_session() {
    helpers::init_test_logging();

    // Swings carrying all three capture modes at once
    let pipeline = SessionPipeline::new(PipelineConfig::default());
    let mut rng = StdRng::seed_from_u64(41);

    let inputs: Vec<SwingInput> = (0..6)
        .map(|_| SwingInput {
            swing_id: Uuid::new_v4(),
            sensor: Some(helpers::sensor(152.0, 71.0, 64.0, 9.0)),
            pose: Some(PoseCapture {
                frames: helpers::synthetic_swing_capture(120.0, 120),
                frame_rate: 120.0,
            }),
            segment_peaks: Some(helpers::jittered_peaks(&mut rng, 25.0, 2.0)),
        })
        .collect();

    let session_id = Uuid::new_v4();
    let outcome = pipeline.analyze_session(session_id, &inputs, false).unwrap();

    assert_eq!(outcome.swings.len(), 6);
    for swing in &outcome.swings {
        let kinematics = swing.kinematics.as_ref().expect("pose capture was present");
        assert!(kinematics.quality.is_usable);
        assert!(kinematics.peak_pelvis_velocity_dps > 200.0);
        assert!(swing.sequence_score.unwrap_or(0) > 80, "tight chain should score high");
    }
    assert_eq!(outcome.scores.confidence, ScoreConfidence::Estimated);

    // Scores persist through the storage collaborator
    let store = MemoryStore::new();
    SessionScoreStore::upsert(&store, outcome.scores.clone()).unwrap();
    let stored = SessionScoreStore::get(&store, session_id).unwrap().unwrap();
    assert_eq!(stored.composite, outcome.scores.composite);
}

#[test]
fn test_sequence_timing_degrades_with_jitter() {
    let analyzer = SequenceAnalyzer::default();

    let mut tight_rng = StdRng::seed_from_u64(7);
    let mut loose_rng = StdRng::seed_from_u64(7);
    let tight = analyzer
        .analyze(&helpers::jittered_peaks(&mut tight_rng, 25.0, 1.0))
        .unwrap();
    let loose = analyzer
        .analyze(&helpers::jittered_peaks(&mut loose_rng, 25.0, 20.0))
        .unwrap();

    assert!(tight.timing_score > loose.timing_score);
}

#[test]
fn test_ghost_recovery_versus_measured_ball() {
    let pipeline = SessionPipeline::new(PipelineConfig::default());

    let ghost = pipeline
        .analyze_session(Uuid::new_v4(), &sensor_inputs(&[150.0; 5]), false)
        .unwrap();
    assert_eq!(ghost.scores.confidence, ScoreConfidence::Estimated);

    let mut measured_inputs = sensor_inputs(&[150.0; 5]);
    for input in &mut measured_inputs {
        input.sensor.as_mut().unwrap().exit_velocity_mph = Some(94.0);
    }
    let measured = pipeline
        .analyze_session(Uuid::new_v4(), &measured_inputs, false)
        .unwrap();
    assert_eq!(measured.scores.confidence, ScoreConfidence::Measured);
}

#[test]
fn test_category_scores_stay_in_band_for_wild_input() {
    let pipeline = SessionPipeline::new(PipelineConfig::default());
    let inputs: Vec<SwingInput> = [
        (5.0, 120.0, 10.0, -40.0),
        (950.0, 4.0, 3.9, 42.0),
        (5.0, 120.0, 10.0, -40.0),
        (950.0, 4.0, 3.9, 42.0),
    ]
    .iter()
    .map(|(t, b, h, a)| SwingInput::from_sensor(Uuid::new_v4(), helpers::sensor(*t, *b, *h, *a)))
    .collect();

    let outcome = pipeline
        .analyze_session(Uuid::new_v4(), &inputs, false)
        .unwrap();

    for category in Category::all() {
        let score = outcome.scores.score(category);
        assert!(
            (20.0..=80.0).contains(&score),
            "{} escaped the band: {}",
            category.as_str(),
            score
        );
    }
}

#[test]
fn test_athlete_calibration_end_to_end() {
    let pipeline = SessionPipeline::new(PipelineConfig::default());
    let store = MemoryStore::new();
    let athlete_id = Uuid::new_v4();

    // Historical sessions generated from a known linear relationship
    let samples: Vec<CalibrationSample> = (0..20)
        .map(|i| {
            let brain = 45.0 + ((i * 7) % 13) as f64;
            let body = 50.0 + ((i * 5) % 11) as f64;
            let bat = 48.0 + ((i * 3) % 17) as f64;
            let ball = 52.0 + ((i * 11) % 7) as f64;
            CalibrationSample {
                scores: [brain, body, bat, ball],
                bat_speed_mph: 15.0 + 0.5 * brain + 0.25 * body + 0.15 * bat + 0.1 * ball,
            }
        })
        .collect();

    let model = pipeline
        .calibrate_athlete(athlete_id, &samples, &store)
        .unwrap();

    assert!(model.r_squared > 0.95);
    assert_eq!(model.quality, ModelQuality::Strong);

    // Recalibration overwrites the live model in place
    let recalibrated = pipeline
        .calibrate_athlete(athlete_id, &samples[..10], &store)
        .unwrap();
    let live = AthleteModelStore::get(&store, athlete_id).unwrap().unwrap();
    assert_eq!(live.sample_count, recalibrated.sample_count);
    assert_eq!(live.sample_count, 10);
}

#[test]
fn test_short_history_fails_before_any_write() {
    let pipeline = SessionPipeline::new(PipelineConfig::default());
    let store = MemoryStore::new();
    let athlete_id = Uuid::new_v4();

    let samples = vec![
        CalibrationSample {
            scores: [55.0, 60.0, 58.0, 50.0],
            bat_speed_mph: 66.0,
        };
        4
    ];

    let err = pipeline
        .calibrate_athlete(athlete_id, &samples, &store)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("requires 5"), "got: {message}");
    assert!(message.contains("got 4"), "got: {message}");
    assert!(AthleteModelStore::get(&store, athlete_id).unwrap().is_none());
}
