use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::persistence::{AgentStore, MissionStore};
use crate::services::{AgentDirectory, BreedValidator, MissionEngine};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub agents: AgentDirectory,
    pub missions: MissionEngine,
    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(agents: AgentDirectory, missions: MissionEngine) -> Self {
        Self {
            agents,
            missions,
            start_time: Utc::now(),
        }
    }

    /// Wire both services over a single backing store
    pub fn from_store<S>(store: Arc<S>, breeds: Option<Arc<dyn BreedValidator>>) -> Self
    where
        S: AgentStore + MissionStore + 'static,
    {
        let mut agents = AgentDirectory::new(store.clone());
        if let Some(breeds) = breeds {
            agents = agents.with_breed_validator(breeds);
        }
        let missions = MissionEngine::new(store, agents.clone());
        Self::new(agents, missions)
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
