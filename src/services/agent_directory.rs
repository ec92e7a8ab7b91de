//! Agent directory
//!
//! Owns agent records and their pay rate. Breed validation is delegated to an
//! optional [`BreedValidator`] and only runs when an agent is created.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::agent::validate_salary;
use crate::domain::{Agent, NewAgent};
use crate::error::{AgencyError, Result};
use crate::persistence::AgentStore;

const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

/// External breed reference list.
///
/// Implementations return `Ok(false)` for an unknown breed and
/// `AgencyError::ServiceUnavailable` when the list cannot be consulted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BreedValidator: Send + Sync {
    async fn is_known_breed(&self, breed: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct AgentDirectory {
    store: Arc<dyn AgentStore>,
    breeds: Option<Arc<dyn BreedValidator>>,
    validation_timeout: Duration,
}

impl AgentDirectory {
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self {
            store,
            breeds: None,
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
        }
    }

    pub fn with_breed_validator(mut self, breeds: Arc<dyn BreedValidator>) -> Self {
        self.breeds = Some(breeds);
        self
    }

    /// Upper bound on a single breed lookup, on top of any client-side timeout
    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    pub async fn create_agent(&self, agent: NewAgent) -> Result<i64> {
        let agent = agent.normalized()?;
        self.check_breed(&agent.breed).await?;
        self.store.insert_agent(&agent).await
    }

    pub async fn get_agent(&self, id: i64) -> Result<Agent> {
        self.store
            .find_agent(id)
            .await?
            .ok_or_else(|| AgencyError::agent_not_found(id))
    }

    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        self.store.list_agents().await
    }

    pub async fn update_salary(&self, id: i64, salary: Decimal) -> Result<Agent> {
        validate_salary(salary)?;
        self.store
            .update_salary(id, salary)
            .await?
            .ok_or_else(|| AgencyError::agent_not_found(id))
    }

    /// Missions still pointing at the agent are unassigned by the store
    pub async fn delete_agent(&self, id: i64) -> Result<()> {
        if !self.store.delete_agent(id).await? {
            return Err(AgencyError::agent_not_found(id));
        }
        Ok(())
    }

    pub async fn agent_exists(&self, id: i64) -> Result<bool> {
        self.store.agent_exists(id).await
    }

    async fn check_breed(&self, breed: &str) -> Result<()> {
        let Some(breeds) = &self.breeds else {
            return Ok(());
        };

        let known = tokio::time::timeout(self.validation_timeout, breeds.is_known_breed(breed))
            .await
            .map_err(|_| {
                AgencyError::ServiceUnavailable(format!(
                    "breed lookup timed out after {}ms",
                    self.validation_timeout.as_millis()
                ))
            })??;

        if !known {
            return Err(AgencyError::InvalidCategory(breed.to_string()));
        }
        Ok(())
    }
}
