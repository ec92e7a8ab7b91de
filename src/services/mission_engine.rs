//! Mission engine
//!
//! Owns the mission and target state machines:
//!
//! - a mission holds at most [`MAX_TARGETS`] targets
//! - a mission completes only when all of its targets are complete
//! - an agent has at most one active (incomplete) mission
//! - an assigned mission cannot be deleted
//! - targets of a complete mission, and complete targets, are frozen
//!
//! Completion is terminal for both missions and targets.
//!
//! Every operation reads fresh state from the store, checks the rules and then
//! writes. Only mission creation is transactional; the check-then-write window
//! of the other operations is left open, except for agent assignment which the
//! PostgreSQL schema backs with a partial unique index.

use std::sync::Arc;

use super::agent_directory::AgentDirectory;
use crate::domain::{
    FieldPatch, Mission, MissionChanges, MissionPatch, MissionSummary, NewTarget, Target,
    MAX_TARGETS,
};
use crate::error::{AgencyError, Result};
use crate::persistence::MissionStore;

#[derive(Clone)]
pub struct MissionEngine {
    store: Arc<dyn MissionStore>,
    agents: AgentDirectory,
}

impl MissionEngine {
    pub fn new(store: Arc<dyn MissionStore>, agents: AgentDirectory) -> Self {
        Self { store, agents }
    }

    /// Create a mission and its initial targets atomically
    pub async fn create_mission(&self, targets: Vec<NewTarget>) -> Result<i64> {
        if targets.len() > MAX_TARGETS {
            return Err(AgencyError::Validation(format!(
                "a mission can have at most {MAX_TARGETS} targets, got {}",
                targets.len()
            )));
        }
        let targets = targets
            .into_iter()
            .map(NewTarget::normalized)
            .collect::<Result<Vec<_>>>()?;

        self.store.create_mission(&targets).await
    }

    pub async fn get_mission(&self, id: i64) -> Result<Mission> {
        self.store
            .find_mission(id)
            .await?
            .ok_or_else(|| AgencyError::mission_not_found(id))
    }

    pub async fn list_missions(&self) -> Result<Vec<MissionSummary>> {
        self.store.list_missions().await
    }

    /// Apply the fields present in `patch` and return the refreshed mission
    pub async fn update_mission(&self, id: i64, patch: MissionPatch) -> Result<Mission> {
        let mission = self.get_mission(id).await?;
        if patch.is_empty() {
            return Ok(mission);
        }

        let mut changes = MissionChanges::default();

        match patch.agent_id {
            FieldPatch::Absent => {}
            FieldPatch::Clear => changes.agent_id = Some(None),
            FieldPatch::Set(agent_id) => {
                if mission.agent_id != Some(agent_id) {
                    self.ensure_assignable(&mission, agent_id).await?;
                }
                changes.agent_id = Some(Some(agent_id));
            }
        }

        match patch.complete {
            Some(true) if !mission.complete => {
                let pending = mission.incomplete_targets();
                if pending > 0 {
                    return Err(AgencyError::Conflict(format!(
                        "mission {id} still has {pending} incomplete target(s)"
                    )));
                }
                changes.complete = Some(true);
            }
            Some(false) if mission.complete => {
                return Err(AgencyError::Conflict(format!(
                    "mission {id} is complete and cannot be reopened"
                )));
            }
            // Already in the requested state
            Some(_) | None => {}
        }

        if !changes.is_empty() && !self.store.update_mission(id, changes).await? {
            return Err(AgencyError::mission_not_found(id));
        }

        self.get_mission(id).await
    }

    async fn ensure_assignable(&self, mission: &Mission, agent_id: i64) -> Result<()> {
        if mission.complete {
            return Err(AgencyError::Conflict(format!(
                "mission {} is complete and cannot be reassigned",
                mission.id
            )));
        }

        if !self.agents.agent_exists(agent_id).await? {
            return Err(AgencyError::Validation(format!(
                "agent {agent_id} does not exist"
            )));
        }

        let busy = self
            .store
            .active_missions_for_agent(agent_id)
            .await?
            .iter()
            .any(|other| other.id != mission.id);
        if busy {
            return Err(AgencyError::AgentBusy { agent_id });
        }
        Ok(())
    }

    pub async fn delete_mission(&self, id: i64) -> Result<()> {
        let mission = self.get_mission(id).await?;
        if mission.is_assigned() {
            return Err(AgencyError::Assigned { mission_id: id });
        }
        if !self.store.delete_mission(id).await? {
            return Err(AgencyError::mission_not_found(id));
        }
        Ok(())
    }

    pub async fn add_target(&self, mission_id: i64, target: NewTarget) -> Result<i64> {
        let target = target.normalized()?;
        let mission = self.get_mission(mission_id).await?;

        if !mission.has_room_for_target() {
            return Err(AgencyError::MaxTargets {
                mission_id,
                max: MAX_TARGETS,
            });
        }
        if mission.complete {
            return Err(AgencyError::Conflict(format!(
                "mission {mission_id} is already complete"
            )));
        }

        self.store.insert_target(mission_id, &target).await
    }

    pub async fn get_target(&self, mission_id: i64, target_id: i64) -> Result<Target> {
        let mission = self.get_mission(mission_id).await?;
        mission
            .target(target_id)
            .cloned()
            .ok_or_else(|| AgencyError::target_not_found(target_id))
    }

    /// Overwrite notes and completion of a pending target
    pub async fn update_target(
        &self,
        mission_id: i64,
        target_id: i64,
        notes: String,
        complete: bool,
    ) -> Result<Target> {
        let mission = self.get_mission(mission_id).await?;
        let target = Self::editable_target(&mission, target_id)?;

        self.store
            .update_target(mission_id, target.id, &notes, complete)
            .await?
            .ok_or_else(|| AgencyError::target_not_found(target_id))
    }

    pub async fn delete_target(&self, mission_id: i64, target_id: i64) -> Result<()> {
        let mission = self.get_mission(mission_id).await?;
        let target = Self::editable_target(&mission, target_id)?;

        if !self.store.delete_target(mission_id, target.id).await? {
            return Err(AgencyError::target_not_found(target_id));
        }
        Ok(())
    }

    /// Storage reachability, for health checks
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    /// A target can change only while both it and its mission are pending
    fn editable_target(mission: &Mission, target_id: i64) -> Result<&Target> {
        let target = mission
            .target(target_id)
            .ok_or_else(|| AgencyError::target_not_found(target_id))?;

        if mission.complete {
            return Err(AgencyError::Conflict(format!(
                "mission {} is already complete",
                mission.id
            )));
        }
        if target.complete {
            return Err(AgencyError::Conflict(format!(
                "target {target_id} is already complete"
            )));
        }
        Ok(target)
    }
}
