//! Session analysis pipeline
//!
//! Orchestrates the full path from raw swing telemetry to session scores:
//! per-swing pose extraction and sequence analysis, then composite 4B
//! scoring over the merged swing records, with an advisory cache in front.
//!
//! # Error Handling
//! Per-swing error isolation: a failed pose extraction or sequence
//! analysis degrades that swing (logged, fields left empty) without
//! failing the session. Session-level failures (empty batch, no sensor
//! data at all) surface as errors.

use crate::analysis::{
    CalibrationSample, Calibrator, KinematicsExtractor, SegmentPeak, SequenceAnalyzer,
    SessionScorer,
};
use crate::cache::ScoreCache;
use crate::error::EngineResult;
use crate::store::AthleteModelStore;
use chrono::Duration;
use fourb_common::config::TomlConfig;
use fourb_common::landmarks::PoseFrame;
use fourb_common::models::{AthleteModel, SensorReadings, SessionScores, Swing};
use fourb_common::params::EngineParams;
use fourb_common::time::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Engine tuning parameters
    pub params: EngineParams,
    /// Lifetime of cached session scores (minutes)
    pub cache_ttl_minutes: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            params: EngineParams::default(),
            cache_ttl_minutes: 30,
        }
    }
}

impl From<TomlConfig> for PipelineConfig {
    fn from(config: TomlConfig) -> Self {
        Self {
            params: config.params,
            ..Self::default()
        }
    }
}

/// Pose capture for one swing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseCapture {
    /// Time-ordered pose frames
    pub frames: Vec<PoseFrame>,
    /// Capture rate (frames per second)
    pub frame_rate: f64,
}

/// Raw per-swing inputs supplied by the capture collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwingInput {
    /// Swing identity
    pub swing_id: Uuid,
    /// Bat-sensor readings, when present
    pub sensor: Option<SensorReadings>,
    /// Camera pose capture, when present
    pub pose: Option<PoseCapture>,
    /// Segment peak-activation times, when present
    pub segment_peaks: Option<Vec<SegmentPeak>>,
}

impl SwingInput {
    /// Input with sensor readings only
    pub fn from_sensor(swing_id: Uuid, sensor: SensorReadings) -> Self {
        Self {
            swing_id,
            sensor: Some(sensor),
            pose: None,
            segment_peaks: None,
        }
    }
}

/// Analyzed session handed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Aggregate 4B scores
    pub scores: SessionScores,
    /// Per-swing records (empty on a cache hit)
    pub swings: Vec<Swing>,
    /// Whether the scores came from the cache
    pub from_cache: bool,
}

/// Session pipeline orchestrator
pub struct SessionPipeline {
    extractor: KinematicsExtractor,
    sequencer: SequenceAnalyzer,
    scorer: SessionScorer,
    calibrator: Calibrator,
    cache: ScoreCache,
}

impl SessionPipeline {
    /// Create a pipeline on the system clock
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a pipeline with an injected time source
    pub fn with_clock(config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        let params = config.params;
        Self {
            extractor: KinematicsExtractor::new(params.kinematics),
            sequencer: SequenceAnalyzer::new(params.sequence),
            scorer: SessionScorer::new(params.scoring),
            calibrator: Calibrator::new(params.calibration),
            cache: ScoreCache::new(Duration::minutes(config.cache_ttl_minutes), clock),
        }
    }

    /// Analyze a session's swings into 4B scores
    ///
    /// Returns cached scores when an unexpired result exists, unless
    /// `force` requests a recompute. The cache check is advisory: a
    /// concurrent recompute may still land first.
    pub fn analyze_session(
        &self,
        session_id: Uuid,
        inputs: &[SwingInput],
        force: bool,
    ) -> EngineResult<SessionOutcome> {
        if !force {
            if let Some(scores) = self.cache.get(session_id) {
                debug!(%session_id, "Returning cached session scores");
                return Ok(SessionOutcome {
                    scores,
                    swings: Vec::new(),
                    from_cache: true,
                });
            }
        }

        info!(%session_id, swings = inputs.len(), force, "Analyzing session");

        let swings: Vec<Swing> = inputs.iter().map(|i| self.analyze_swing(i)).collect();
        let scores = self.scorer.score_session(session_id, &swings)?;
        self.cache.insert(scores.clone());

        info!(
            %session_id,
            composite = scores.composite,
            weakest = scores.weakest_link.as_str(),
            "Session analysis complete"
        );

        Ok(SessionOutcome {
            scores,
            swings,
            from_cache: false,
        })
    }

    /// Analyze one swing; failures degrade the swing, never the session
    fn analyze_swing(&self, input: &SwingInput) -> Swing {
        let mut swing = Swing::new(input.swing_id);
        swing.sensor = input.sensor.clone();

        if let Some(pose) = &input.pose {
            match self.extractor.extract(&pose.frames, pose.frame_rate) {
                Ok(extraction) => {
                    if !extraction.summary.quality.is_usable {
                        warn!(
                            swing = %input.swing_id,
                            issues = ?extraction.summary.quality.issues,
                            "Pose extraction not usable"
                        );
                    }
                    swing.kinematics = Some(extraction.summary);
                }
                Err(e) => {
                    warn!(swing = %input.swing_id, error = %e, "Pose extraction failed");
                }
            }
        }

        if let Some(peaks) = &input.segment_peaks {
            match self.sequencer.analyze(peaks) {
                Ok(analysis) => swing.sequence_score = Some(analysis.score),
                Err(e) => {
                    warn!(swing = %input.swing_id, error = %e, "Sequence analysis failed");
                }
            }
        }

        swing
    }

    /// Fit an athlete's model and persist it
    ///
    /// The minimum-sample check runs before any write: a failed
    /// calibration never touches the store.
    pub fn calibrate_athlete(
        &self,
        athlete_id: Uuid,
        samples: &[CalibrationSample],
        store: &dyn AthleteModelStore,
    ) -> EngineResult<AthleteModel> {
        let model = self.calibrator.calibrate(athlete_id, samples)?;
        store.upsert(model.clone())?;

        info!(
            %athlete_id,
            r_squared = model.r_squared,
            samples = model.sample_count,
            "Athlete model calibrated and stored"
        );

        Ok(model)
    }

    /// Drop a session's cached scores
    pub fn invalidate_cached(&self, session_id: Uuid) {
        self.cache.invalidate(session_id);
    }
}
