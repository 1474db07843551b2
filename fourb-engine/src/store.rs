//! Storage collaborator boundary
//!
//! The engine owns no persistence technology; these traits express the
//! contract the external storage layer fulfills. Both stores upsert:
//! recomputation overwrites the previous record for the same key, and
//! concurrent writers resolve last-write-wins at the storage layer.
//!
//! `MemoryStore` backs tests and embedding callers that keep everything
//! in process.

use fourb_common::models::{AthleteModel, SessionScores};
use fourb_common::Result;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Durable home for session score records
pub trait SessionScoreStore: Send + Sync {
    /// Insert or overwrite the record for this session
    fn upsert(&self, scores: SessionScores) -> Result<()>;

    /// Fetch the record for a session, if one exists
    fn get(&self, session_id: Uuid) -> Result<Option<SessionScores>>;
}

/// Durable home for athlete model records (one live model per athlete)
pub trait AthleteModelStore: Send + Sync {
    /// Insert or overwrite the athlete's model
    fn upsert(&self, model: AthleteModel) -> Result<()>;

    /// Fetch the athlete's live model, if one exists
    fn get(&self, athlete_id: Uuid) -> Result<Option<AthleteModel>>;
}

/// In-memory store implementing both contracts
#[derive(Default)]
pub struct MemoryStore {
    scores: RwLock<HashMap<Uuid, SessionScores>>,
    models: RwLock<HashMap<Uuid, AthleteModel>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionScoreStore for MemoryStore {
    fn upsert(&self, scores: SessionScores) -> Result<()> {
        let mut map = self.scores.write().expect("store lock poisoned");
        map.insert(scores.session_id, scores);
        Ok(())
    }

    fn get(&self, session_id: Uuid) -> Result<Option<SessionScores>> {
        let map = self.scores.read().expect("store lock poisoned");
        Ok(map.get(&session_id).cloned())
    }
}

impl AthleteModelStore for MemoryStore {
    fn upsert(&self, model: AthleteModel) -> Result<()> {
        let mut map = self.models.write().expect("store lock poisoned");
        map.insert(model.athlete_id, model);
        Ok(())
    }

    fn get(&self, athlete_id: Uuid) -> Result<Option<AthleteModel>> {
        let map = self.models.read().expect("store lock poisoned");
        Ok(map.get(&athlete_id).cloned())
    }
}
