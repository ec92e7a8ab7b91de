use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::FieldPatch;
use crate::error::{AgencyError, Result};

/// Hard cap on targets per mission
pub const MAX_TARGETS: usize = 3;

/// A mission with its targets loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    pub agent_id: Option<i64>,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
    pub targets: Vec<Target>,
}

impl Mission {
    pub fn is_assigned(&self) -> bool {
        self.agent_id.is_some()
    }

    pub fn target(&self, target_id: i64) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == target_id)
    }

    pub fn incomplete_targets(&self) -> usize {
        self.targets.iter().filter(|t| !t.complete).count()
    }

    pub fn has_room_for_target(&self) -> bool {
        self.targets.len() < MAX_TARGETS
    }
}

/// List view of a mission, without targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub id: i64,
    pub agent_id: Option<i64>,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub mission_id: i64,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

/// Name and country of a target to be created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTarget {
    pub name: String,
    pub country: String,
}

impl NewTarget {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    pub fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let country = self.country.trim().to_string();
        if name.is_empty() {
            return Err(AgencyError::Validation(
                "target name is required".to_string(),
            ));
        }
        if country.is_empty() {
            return Err(AgencyError::Validation(
                "target country is required".to_string(),
            ));
        }
        Ok(Self { name, country })
    }
}

/// Partial update of a mission as requested by a caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MissionPatch {
    #[serde(default)]
    pub agent_id: FieldPatch<i64>,
    #[serde(default)]
    pub complete: Option<bool>,
}

impl MissionPatch {
    pub fn assign(agent_id: i64) -> Self {
        Self {
            agent_id: FieldPatch::Set(agent_id),
            complete: None,
        }
    }

    pub fn unassign() -> Self {
        Self {
            agent_id: FieldPatch::Clear,
            complete: None,
        }
    }

    pub fn complete() -> Self {
        Self {
            agent_id: FieldPatch::Absent,
            complete: Some(true),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.agent_id.is_absent() && self.complete.is_none()
    }
}

/// Column changes the store should write. `None` leaves a column untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionChanges {
    pub agent_id: Option<Option<i64>>,
    pub complete: Option<bool>,
}

impl MissionChanges {
    pub fn is_empty(&self) -> bool {
        self.agent_id.is_none() && self.complete.is_none()
    }
}
