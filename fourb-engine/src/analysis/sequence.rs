//! Kinetic-chain sequence analysis
//!
//! Scores how closely the observed segment firing order and timing match
//! the ideal ground-up chain (rear leg → lead leg → torso → bottom arm →
//! top arm → bat). Ordering fidelity is an inversion count against the
//! ideal permutation; timing tightness is the spread of inter-peak
//! intervals.

use fourb_common::params::SequenceParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Number of links in the kinetic chain
pub const CHAIN_LENGTH: usize = 6;

/// Body segments of the kinetic chain, declared in ideal firing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    RearLeg,
    LeadLeg,
    Torso,
    BottomArm,
    TopArm,
    Bat,
}

impl Segment {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::RearLeg => "rear leg",
            Segment::LeadLeg => "lead leg",
            Segment::Torso => "torso",
            Segment::BottomArm => "bottom arm",
            Segment::TopArm => "top arm",
            Segment::Bat => "bat",
        }
    }

    /// Position in the ideal chain (0-based)
    pub fn ideal_position(&self) -> usize {
        *self as usize
    }

    /// The ideal ground-up firing order
    pub fn ideal_order() -> [Self; CHAIN_LENGTH] {
        [
            Segment::RearLeg,
            Segment::LeadLeg,
            Segment::Torso,
            Segment::BottomArm,
            Segment::TopArm,
            Segment::Bat,
        ]
    }
}

/// Sequence analysis errors
#[derive(Debug, Error)]
pub enum SequenceError {
    /// Wrong number of segment peaks
    #[error("Expected exactly {expected} segment peaks, got {actual}")]
    WrongSegmentCount { expected: usize, actual: usize },

    /// A segment appears more than once
    #[error("Duplicate peak for segment: {0}")]
    DuplicateSegment(&'static str),

    /// NaN or infinite peak time
    #[error("Non-finite peak time for segment: {0}")]
    InvalidPeakTime(&'static str),
}

/// Observed peak-activation time for one segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentPeak {
    /// Which chain link
    pub segment: Segment,
    /// When its rotational speed peaked (ms from capture start)
    pub peak_time_ms: f64,
}

impl SegmentPeak {
    /// Create a segment peak
    pub fn new(segment: Segment, peak_time_ms: f64) -> Self {
        Self {
            segment,
            peak_time_ms,
        }
    }
}

/// Which way a segment missed its slot in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringDirection {
    /// Fired before its ideal position
    Early,
    /// Fired after its ideal position
    Late,
}

impl FiringDirection {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FiringDirection::Early => "early",
            FiringDirection::Late => "late",
        }
    }
}

/// One segment out of its ideal slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingError {
    /// The offending segment
    pub segment: Segment,
    /// Ideal slot (0-based)
    pub expected_position: usize,
    /// Observed slot (0-based)
    pub actual_position: usize,
    /// Early or late relative to the ideal slot
    pub direction: FiringDirection,
    /// Human-readable description
    pub description: String,
}

/// Complete per-swing sequence analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceAnalysis {
    /// The ideal chain
    pub ideal_order: [Segment; CHAIN_LENGTH],
    /// Segments sorted by observed peak time
    pub actual_order: [Segment; CHAIN_LENGTH],
    /// Segments that missed their slot
    pub errors: Vec<OrderingError>,
    /// Pairwise order disagreements against the ideal chain
    pub inversions: usize,
    /// Ordering fidelity (0-100)
    pub order_score: f64,
    /// Timing tightness (0-100)
    pub timing_score: f64,
    /// Combined sequence score (0-100)
    pub score: u8,
    /// Exact match with the ideal chain, independent of timing
    pub in_sequence: bool,
    /// Human-readable summary
    pub summary: String,
}

/// Kinetic-chain sequence analyzer
pub struct SequenceAnalyzer {
    params: SequenceParams,
}

impl SequenceAnalyzer {
    /// Create an analyzer with the given parameters
    pub fn new(params: SequenceParams) -> Self {
        Self { params }
    }

    /// Analyze one swing's segment peak times
    ///
    /// # Arguments
    /// * `peaks` - one peak per chain segment, each segment exactly once
    ///
    /// # Errors
    /// Returns `SequenceError` when a segment is missing, duplicated, or
    /// carries a non-finite peak time.
    pub fn analyze(&self, peaks: &[SegmentPeak]) -> Result<SequenceAnalysis, SequenceError> {
        if peaks.len() != CHAIN_LENGTH {
            return Err(SequenceError::WrongSegmentCount {
                expected: CHAIN_LENGTH,
                actual: peaks.len(),
            });
        }

        let mut seen = [false; CHAIN_LENGTH];
        for peak in peaks {
            if !peak.peak_time_ms.is_finite() {
                return Err(SequenceError::InvalidPeakTime(peak.segment.as_str()));
            }
            let slot = peak.segment.ideal_position();
            if seen[slot] {
                return Err(SequenceError::DuplicateSegment(peak.segment.as_str()));
            }
            seen[slot] = true;
        }

        // Actual order: ascending peak time, ties broken by ideal position
        // so degenerate inputs stay deterministic
        let mut ordered: Vec<SegmentPeak> = peaks.to_vec();
        ordered.sort_by(|a, b| {
            a.peak_time_ms
                .partial_cmp(&b.peak_time_ms)
                .expect("peak times validated finite")
                .then_with(|| a.segment.ideal_position().cmp(&b.segment.ideal_position()))
        });

        let ideal_order = Segment::ideal_order();
        let mut actual_order = ideal_order;
        let mut actual_position = [0usize; CHAIN_LENGTH];
        for (slot, peak) in ordered.iter().enumerate() {
            actual_order[slot] = peak.segment;
            actual_position[peak.segment.ideal_position()] = slot;
        }

        let errors = self.ordering_errors(&actual_position);
        let inversions = count_inversions(&actual_position);
        let max_inversions = CHAIN_LENGTH * (CHAIN_LENGTH - 1) / 2;
        let order_score = (1.0 - inversions as f64 / max_inversions as f64) * 100.0;

        let timing_score = self.timing_score(&ordered);
        let combined = self.params.order_weight * order_score
            + self.params.timing_weight * timing_score;
        let score = combined.round().clamp(0.0, 100.0) as u8;
        let in_sequence = inversions == 0;

        let summary = self.summarize(in_sequence, &errors);

        debug!(
            inversions,
            order_score, timing_score, score, in_sequence, "Sequence analysis complete"
        );

        Ok(SequenceAnalysis {
            ideal_order,
            actual_order,
            errors,
            inversions,
            order_score,
            timing_score,
            score,
            in_sequence,
            summary,
        })
    }

    /// Record each segment that missed its ideal slot
    fn ordering_errors(&self, actual_position: &[usize; CHAIN_LENGTH]) -> Vec<OrderingError> {
        let mut errors = Vec::new();

        for segment in Segment::ideal_order() {
            let expected = segment.ideal_position();
            let actual = actual_position[expected];
            if actual == expected {
                continue;
            }

            let direction = if actual < expected {
                FiringDirection::Early
            } else {
                FiringDirection::Late
            };
            let description = format!(
                "{} fired {}: slot {} of the chain, observed slot {}",
                segment.as_str(),
                direction.as_str(),
                expected + 1,
                actual + 1
            );

            errors.push(OrderingError {
                segment,
                expected_position: expected,
                actual_position: actual,
                direction,
                description,
            });
        }

        errors
    }

    /// Timing tightness from inter-peak intervals along the actual order
    fn timing_score(&self, ordered: &[SegmentPeak]) -> f64 {
        let intervals: Vec<f64> = ordered
            .windows(2)
            .map(|pair| pair[1].peak_time_ms - pair[0].peak_time_ms)
            .collect();

        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        if mean <= f64::EPSILON {
            // Simultaneous peaks: intervals are all identical (zero)
            return 100.0;
        }

        let variance = intervals.iter().map(|i| (i - mean).powi(2)).sum::<f64>()
            / intervals.len() as f64;
        let cv = variance.sqrt() / mean;

        (100.0 - self.params.timing_cv_penalty * cv).max(0.0)
    }

    /// Human-readable verdict naming early and late segments
    fn summarize(&self, in_sequence: bool, errors: &[OrderingError]) -> String {
        if in_sequence {
            return "In sequence: all six links fired in the ideal order.".to_string();
        }

        let early: Vec<&str> = errors
            .iter()
            .filter(|e| e.direction == FiringDirection::Early)
            .map(|e| e.segment.as_str())
            .collect();
        let late: Vec<&str> = errors
            .iter()
            .filter(|e| e.direction == FiringDirection::Late)
            .map(|e| e.segment.as_str())
            .collect();

        let mut parts = Vec::new();
        if !early.is_empty() {
            parts.push(format!("early: {}", early.join(", ")));
        }
        if !late.is_empty() {
            parts.push(format!("late: {}", late.join(", ")));
        }

        format!("Out of sequence ({})", parts.join("; "))
    }
}

impl Default for SequenceAnalyzer {
    fn default() -> Self {
        Self::new(SequenceParams::default())
    }
}

/// Kendall-tau distance: pairs of chain links whose relative order flipped
fn count_inversions(actual_position: &[usize; CHAIN_LENGTH]) -> usize {
    let mut inversions = 0;
    for i in 0..CHAIN_LENGTH {
        for j in i + 1..CHAIN_LENGTH {
            if actual_position[i] > actual_position[j] {
                inversions += 1;
            }
        }
    }
    inversions
}
