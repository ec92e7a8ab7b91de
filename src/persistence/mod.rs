//! Persistence layer
//!
//! Storage is reached through two traits so the directory and the mission
//! engine can run against PostgreSQL in production and an in-memory store in
//! tests. Implementations only execute reads and writes; every business rule
//! lives in `services`.
//!
//! Conventions shared by all implementations:
//! - lookups return `Ok(None)` for a missing row
//! - updates and deletes report whether a row was affected
//! - deleting an agent clears `agent_id` on its missions
//! - deleting a mission removes its targets
//! - assigning an agent that already has another active mission fails with
//!   `AgencyError::AgentBusy`

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Agent, Mission, MissionChanges, MissionSummary, NewAgent, NewTarget, Target};
use crate::error::Result;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn insert_agent(&self, agent: &NewAgent) -> Result<i64>;

    async fn find_agent(&self, id: i64) -> Result<Option<Agent>>;

    async fn list_agents(&self) -> Result<Vec<Agent>>;

    /// Returns the updated row, or `None` when no agent has this id
    async fn update_salary(&self, id: i64, salary: Decimal) -> Result<Option<Agent>>;

    async fn delete_agent(&self, id: i64) -> Result<bool>;

    async fn agent_exists(&self, id: i64) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MissionStore: Send + Sync {
    /// Insert a mission and its targets in one transaction
    async fn create_mission(&self, targets: &[NewTarget]) -> Result<i64>;

    async fn list_missions(&self) -> Result<Vec<MissionSummary>>;

    /// Mission with all of its targets
    async fn find_mission(&self, id: i64) -> Result<Option<Mission>>;

    /// Incomplete missions currently assigned to `agent_id`
    async fn active_missions_for_agent(&self, agent_id: i64) -> Result<Vec<MissionSummary>>;

    /// Apply `changes` to a mission; `false` when the mission does not exist.
    ///
    /// `changes` is never empty: the engine skips the write for no-op patches.
    async fn update_mission(&self, id: i64, changes: MissionChanges) -> Result<bool>;

    async fn delete_mission(&self, id: i64) -> Result<bool>;

    async fn insert_target(&self, mission_id: i64, target: &NewTarget) -> Result<i64>;

    /// Overwrite notes and completion; `None` when the target is not part of the mission
    async fn update_target(
        &self,
        mission_id: i64,
        target_id: i64,
        notes: &str,
        complete: bool,
    ) -> Result<Option<Target>>;

    async fn delete_target(&self, mission_id: i64, target_id: i64) -> Result<bool>;

    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> Result<()>;
}
