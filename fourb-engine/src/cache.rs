//! Advisory TTL cache for completed session scores
//!
//! An explicit, injectable cache object: no hidden module-level state.
//! Expiry runs off the `Clock` trait so tests drive time deterministically.
//!
//! The cache is advisory only. A concurrent recompute may land between a
//! `get` miss and the subsequent `insert`; the last write wins, matching
//! the storage collaborator's discipline.

use chrono::{DateTime, Duration, Utc};
use fourb_common::models::SessionScores;
use fourb_common::time::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

struct CachedScores {
    scores: SessionScores,
    cached_at: DateTime<Utc>,
}

/// TTL cache keyed by session id
pub struct ScoreCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<Uuid, CachedScores>>,
}

impl ScoreCache {
    /// Create a cache with the given entry lifetime and time source
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Unexpired scores for a session, if cached
    ///
    /// Expired entries are dropped lazily here rather than by a sweeper.
    pub fn get(&self, session_id: Uuid) -> Option<SessionScores> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.get(&session_id)?;

        if self.clock.now() - entry.cached_at >= self.ttl {
            entries.remove(&session_id);
            return None;
        }

        Some(entry.scores.clone())
    }

    /// Cache scores for a session, replacing any previous entry
    pub fn insert(&self, scores: SessionScores) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            scores.session_id,
            CachedScores {
                scores,
                cached_at: self.clock.now(),
            },
        );
    }

    /// Drop a session's entry, if present
    pub fn invalidate(&self, session_id: Uuid) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.remove(&session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourb_common::models::{Category, ScoreConfidence};
    use fourb_common::time::ManualClock;

    fn scores(session_id: Uuid) -> SessionScores {
        SessionScores {
            session_id,
            brain: 60.0,
            body: 65.0,
            bat: 58.0,
            ball: 52.0,
            composite: 59.0,
            weakest_link: Category::Ball,
            leaks: Vec::new(),
            confidence: ScoreConfidence::Estimated,
            swing_count: 10,
            computed_at: Utc::now(),
        }
    }

    fn cache_with_clock() -> (ScoreCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = ScoreCache::new(Duration::minutes(30), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_hit_within_ttl() {
        let (cache, clock) = cache_with_clock();
        let session_id = Uuid::new_v4();
        cache.insert(scores(session_id));

        clock.advance(Duration::minutes(29));
        assert!(cache.get(session_id).is_some());
    }

    #[test]
    fn test_miss_after_ttl() {
        let (cache, clock) = cache_with_clock();
        let session_id = Uuid::new_v4();
        cache.insert(scores(session_id));

        clock.advance(Duration::minutes(30));
        assert!(cache.get(session_id).is_none());
        // A second get stays a miss (entry was dropped)
        assert!(cache.get(session_id).is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let (cache, _clock) = cache_with_clock();
        let session_id = Uuid::new_v4();

        cache.insert(scores(session_id));
        let mut updated = scores(session_id);
        updated.composite = 71.0;
        cache.insert(updated);

        assert_eq!(cache.get(session_id).unwrap().composite, 71.0);
    }

    #[test]
    fn test_invalidate() {
        let (cache, _clock) = cache_with_clock();
        let session_id = Uuid::new_v4();

        cache.insert(scores(session_id));
        cache.invalidate(session_id);
        assert!(cache.get(session_id).is_none());
    }

    #[test]
    fn test_unknown_session_misses() {
        let (cache, _clock) = cache_with_clock();
        assert!(cache.get(Uuid::new_v4()).is_none());
    }
}
