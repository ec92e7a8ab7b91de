use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::api::{
    error::ApiResult,
    state::AppState,
    types::{CreatedResponse, UpdateSalaryRequest},
};
use crate::domain::{Agent, NewAgent};

/// GET /agents
pub async fn list_agents(State(state): State<AppState>) -> ApiResult<Json<Vec<Agent>>> {
    Ok(Json(state.agents.list_agents().await?))
}

/// POST /agents
pub async fn create_agent(
    State(state): State<AppState>,
    body: Result<Json<NewAgent>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(agent) = body?;
    let id = state.agents.create_agent(agent).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /agents/:id
pub async fn get_agent(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Agent>> {
    let Path(id) = path?;
    Ok(Json(state.agents.get_agent(id).await?))
}

/// PATCH /agents/:id -- only the salary can change
pub async fn update_agent_salary(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateSalaryRequest>, JsonRejection>,
) -> ApiResult<Json<Agent>> {
    let Path(id) = path?;
    let Json(req) = body?;
    Ok(Json(state.agents.update_salary(id, req.salary).await?))
}

/// DELETE /agents/:id
pub async fn delete_agent(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.agents.delete_agent(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
