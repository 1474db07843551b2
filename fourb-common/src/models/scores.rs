//! Session-level 4B score records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four scoring categories
///
/// Declaration order doubles as the weakest-link tie-break precedence:
/// when two categories tie for the minimum, the earlier one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Decision quality and timing consistency
    Brain,
    /// Ground-up sequencing efficiency
    Body,
    /// Barrel delivery control
    Bat,
    /// Contact and outcome quality
    Ball,
}

impl Category {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Brain => "brain",
            Category::Body => "body",
            Category::Bat => "bat",
            Category::Ball => "ball",
        }
    }

    /// All categories in tie-break precedence order
    pub fn all() -> [Self; 4] {
        [Category::Brain, Category::Body, Category::Bat, Category::Ball]
    }
}

/// Coaching-priority leak flags raised by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeakTag {
    /// Trigger-to-impact timing too inconsistent
    TimingLeak,
    /// Energy lost between hands and barrel
    PowerLeak,
}

impl LeakTag {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LeakTag::TimingLeak => "TIMING_LEAK",
            LeakTag::PowerLeak => "POWER_LEAK",
        }
    }
}

/// Whether the Ball score came from measurement or the ghost heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreConfidence {
    /// Ball-flight exit velocity was measured
    Measured,
    /// Exit velocity was projected from bat and pitch speed
    Estimated,
}

impl ScoreConfidence {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreConfidence::Measured => "measured",
            ScoreConfidence::Estimated => "estimated",
        }
    }
}

/// Aggregate 4B scores for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScores {
    /// Session identity
    pub session_id: Uuid,

    /// Brain category score (20-80)
    pub brain: f64,

    /// Body category score (20-80)
    pub body: f64,

    /// Bat category score (20-80)
    pub bat: f64,

    /// Ball category score (20-80)
    pub ball: f64,

    /// Rounded mean of the four category scores
    pub composite: f64,

    /// Lowest-scoring category (ties broken by declaration order)
    pub weakest_link: Category,

    /// Leak flags raised during scoring
    pub leaks: Vec<LeakTag>,

    /// Measurement confidence of the Ball score
    pub confidence: ScoreConfidence,

    /// Number of swings scored
    pub swing_count: usize,

    /// When the scores were computed
    pub computed_at: DateTime<Utc>,
}

impl SessionScores {
    /// Score for a single category
    pub fn score(&self, category: Category) -> f64 {
        match category {
            Category::Brain => self.brain,
            Category::Body => self.body,
            Category::Bat => self.bat,
            Category::Ball => self.ball,
        }
    }

    /// Whether a leak flag is present
    pub fn has_leak(&self, leak: LeakTag) -> bool {
        self.leaks.contains(&leak)
    }
}
