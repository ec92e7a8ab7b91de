use thiserror::Error;

/// Main error type for the agency backend
#[derive(Error, Debug)]
pub enum AgencyError {
    // Domain errors
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict with current state: {0}")]
    Conflict(String),

    #[error("Mission {mission_id} is assigned to an agent and cannot be deleted")]
    Assigned { mission_id: i64 },

    #[error("Agent {agent_id} is already assigned to another active mission")]
    AgentBusy { agent_id: i64 },

    #[error("Mission {mission_id} already has the maximum of {max} targets")]
    MaxTargets { mission_id: i64, max: usize },

    #[error("Unknown breed: {0}")]
    InvalidCategory(String),

    // External dependency errors
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for AgencyError
pub type Result<T> = std::result::Result<T, AgencyError>;

impl AgencyError {
    pub fn mission_not_found(id: i64) -> Self {
        AgencyError::NotFound {
            entity: "mission",
            id,
        }
    }

    pub fn target_not_found(id: i64) -> Self {
        AgencyError::NotFound { entity: "target", id }
    }

    pub fn agent_not_found(id: i64) -> Self {
        AgencyError::NotFound { entity: "agent", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AgencyError::NotFound { .. })
    }
}
