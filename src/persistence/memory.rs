//! In-memory store for tests.
//!
//! Mirrors the relational behaviour of the PostgreSQL schema: cascading
//! target deletes, `ON DELETE SET NULL` for agents, and the one-active-
//! mission-per-agent unique index.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{AgentStore, MissionStore};
use crate::domain::{Agent, Mission, MissionChanges, MissionSummary, NewAgent, NewTarget, Target};
use crate::error::{AgencyError, Result};

#[derive(Debug, Default)]
struct State {
    next_agent_id: i64,
    next_mission_id: i64,
    next_target_id: i64,
    agents: BTreeMap<i64, Agent>,
    missions: BTreeMap<i64, MissionSummary>,
    targets: BTreeMap<i64, Target>,
}

impl State {
    fn targets_of(&self, mission_id: i64) -> Vec<Target> {
        self.targets
            .values()
            .filter(|t| t.mission_id == mission_id)
            .cloned()
            .collect()
    }

    fn push_target(&mut self, mission_id: i64, target: &NewTarget) -> i64 {
        self.next_target_id += 1;
        let id = self.next_target_id;
        self.targets.insert(
            id,
            Target {
                id,
                mission_id,
                name: target.name.clone(),
                country: target.country.clone(),
                notes: String::new(),
                complete: false,
            },
        );
        id
    }
}

/// Store backed by in-process maps, shared by agents and missions
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentStore for MemoryStore {
    async fn insert_agent(&self, agent: &NewAgent) -> Result<i64> {
        let mut state = self.state.write().await;
        state.next_agent_id += 1;
        let id = state.next_agent_id;
        state.agents.insert(
            id,
            Agent {
                id,
                name: agent.name.clone(),
                years_of_experience: agent.years_of_experience,
                breed: agent.breed.clone(),
                salary: agent.salary,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_agent(&self, id: i64) -> Result<Option<Agent>> {
        Ok(self.state.read().await.agents.get(&id).cloned())
    }

    async fn list_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.state.read().await.agents.values().cloned().collect())
    }

    async fn update_salary(&self, id: i64, salary: Decimal) -> Result<Option<Agent>> {
        let mut state = self.state.write().await;
        Ok(state.agents.get_mut(&id).map(|agent| {
            agent.salary = salary;
            agent.clone()
        }))
    }

    async fn delete_agent(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.agents.remove(&id).is_none() {
            return Ok(false);
        }
        for mission in state.missions.values_mut() {
            if mission.agent_id == Some(id) {
                mission.agent_id = None;
            }
        }
        Ok(true)
    }

    async fn agent_exists(&self, id: i64) -> Result<bool> {
        Ok(self.state.read().await.agents.contains_key(&id))
    }
}

#[async_trait]
impl MissionStore for MemoryStore {
    async fn create_mission(&self, targets: &[NewTarget]) -> Result<i64> {
        let mut state = self.state.write().await;
        state.next_mission_id += 1;
        let id = state.next_mission_id;
        state.missions.insert(
            id,
            MissionSummary {
                id,
                agent_id: None,
                complete: false,
                created_at: Utc::now(),
            },
        );
        for target in targets {
            state.push_target(id, target);
        }
        Ok(id)
    }

    async fn list_missions(&self) -> Result<Vec<MissionSummary>> {
        Ok(self.state.read().await.missions.values().cloned().collect())
    }

    async fn find_mission(&self, id: i64) -> Result<Option<Mission>> {
        let state = self.state.read().await;
        Ok(state.missions.get(&id).map(|m| Mission {
            id: m.id,
            agent_id: m.agent_id,
            complete: m.complete,
            created_at: m.created_at,
            targets: state.targets_of(id),
        }))
    }

    async fn active_missions_for_agent(&self, agent_id: i64) -> Result<Vec<MissionSummary>> {
        Ok(self
            .state
            .read()
            .await
            .missions
            .values()
            .filter(|m| m.agent_id == Some(agent_id) && !m.complete)
            .cloned()
            .collect())
    }

    async fn update_mission(&self, id: i64, changes: MissionChanges) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(current) = state.missions.get(&id).cloned() else {
            return Ok(false);
        };

        let agent_id = changes.agent_id.unwrap_or(current.agent_id);
        let complete = changes.complete.unwrap_or(current.complete);

        if let Some(agent) = agent_id {
            if !state.agents.contains_key(&agent) {
                return Err(AgencyError::Validation(format!(
                    "agent {agent} does not exist"
                )));
            }
            let clash = !complete
                && state
                    .missions
                    .values()
                    .any(|m| m.id != id && m.agent_id == Some(agent) && !m.complete);
            if clash {
                return Err(AgencyError::AgentBusy { agent_id: agent });
            }
        }

        if let Some(mission) = state.missions.get_mut(&id) {
            mission.agent_id = agent_id;
            mission.complete = complete;
        }
        Ok(true)
    }

    async fn delete_mission(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.missions.remove(&id).is_none() {
            return Ok(false);
        }
        state.targets.retain(|_, t| t.mission_id != id);
        Ok(true)
    }

    async fn insert_target(&self, mission_id: i64, target: &NewTarget) -> Result<i64> {
        let mut state = self.state.write().await;
        if !state.missions.contains_key(&mission_id) {
            return Err(AgencyError::mission_not_found(mission_id));
        }
        Ok(state.push_target(mission_id, target))
    }

    async fn update_target(
        &self,
        mission_id: i64,
        target_id: i64,
        notes: &str,
        complete: bool,
    ) -> Result<Option<Target>> {
        let mut state = self.state.write().await;
        Ok(state
            .targets
            .get_mut(&target_id)
            .filter(|t| t.mission_id == mission_id)
            .map(|t| {
                t.notes = notes.to_string();
                t.complete = complete;
                t.clone()
            }))
    }

    async fn delete_target(&self, mission_id: i64, target_id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .targets
            .get(&target_id)
            .is_some_and(|t| t.mission_id == mission_id);
        if owned {
            state.targets.remove(&target_id);
        }
        Ok(owned)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
