use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::NewTarget;

// ============================================================================
// Common Types
// ============================================================================

/// Body of every 201 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Agent Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSalaryRequest {
    pub salary: Decimal,
}

// ============================================================================
// Mission Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMissionRequest {
    #[serde(default)]
    pub targets: Vec<NewTarget>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTargetRequest {
    pub notes: String,
    pub complete: bool,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub uptime_secs: i64,
}
