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
    types::{CreateMissionRequest, CreatedResponse, UpdateTargetRequest},
};
use crate::domain::{Mission, MissionPatch, MissionSummary, NewTarget, Target};

type MissionPath = Result<Path<i64>, PathRejection>;
type TargetPath = Result<Path<(i64, i64)>, PathRejection>;

/// GET /missions
pub async fn list_missions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MissionSummary>>> {
    Ok(Json(state.missions.list_missions().await?))
}

/// POST /missions
pub async fn create_mission(
    State(state): State<AppState>,
    body: Result<Json<CreateMissionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(req) = body?;
    let id = state.missions.create_mission(req.targets).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /missions/:id
pub async fn get_mission(
    State(state): State<AppState>,
    path: MissionPath,
) -> ApiResult<Json<Mission>> {
    let Path(id) = path?;
    Ok(Json(state.missions.get_mission(id).await?))
}

/// PATCH /missions/:id
///
/// `agent_id` may be omitted, `null` (unassign) or an id; `complete` may be
/// omitted or a bool.
pub async fn update_mission(
    State(state): State<AppState>,
    path: MissionPath,
    body: Result<Json<MissionPatch>, JsonRejection>,
) -> ApiResult<Json<Mission>> {
    let Path(id) = path?;
    let Json(patch) = body?;
    Ok(Json(state.missions.update_mission(id, patch).await?))
}

/// DELETE /missions/:id
pub async fn delete_mission(
    State(state): State<AppState>,
    path: MissionPath,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.missions.delete_mission(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /missions/:id/targets
pub async fn add_target(
    State(state): State<AppState>,
    path: MissionPath,
    body: Result<Json<NewTarget>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Path(mission_id) = path?;
    let Json(target) = body?;
    let id = state.missions.add_target(mission_id, target).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /missions/:id/targets/:target_id
pub async fn get_target(
    State(state): State<AppState>,
    path: TargetPath,
) -> ApiResult<Json<Target>> {
    let Path((mission_id, target_id)) = path?;
    Ok(Json(state.missions.get_target(mission_id, target_id).await?))
}

/// PATCH /missions/:id/targets/:target_id
pub async fn update_target(
    State(state): State<AppState>,
    path: TargetPath,
    body: Result<Json<UpdateTargetRequest>, JsonRejection>,
) -> ApiResult<Json<Target>> {
    let Path((mission_id, target_id)) = path?;
    let Json(req) = body?;
    let target = state
        .missions
        .update_target(mission_id, target_id, req.notes, req.complete)
        .await?;
    Ok(Json(target))
}

/// DELETE /missions/:id/targets/:target_id
pub async fn delete_target(
    State(state): State<AppState>,
    path: TargetPath,
) -> ApiResult<StatusCode> {
    let Path((mission_id, target_id)) = path?;
    state.missions.delete_target(mission_id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
