use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::api::types::ErrorResponse;
use crate::error::AgencyError;

const NOT_FOUND: &str = "The requested resource does not exist.";
const INVALID_BODY: &str = "The request body is invalid or missing required fields";
const INTERNAL: &str = "An unexpected error occurred on the server.";

/// HTTP view of an [`AgencyError`]
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AgencyError> for ApiError {
    fn from(err: AgencyError) -> Self {
        match &err {
            AgencyError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, NOT_FOUND),
            AgencyError::Validation(_)
            | AgencyError::MaxTargets { .. }
            | AgencyError::AgentBusy { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            AgencyError::InvalidCategory(breed) => Self::new(
                StatusCode::BAD_REQUEST,
                format!("The specified breed is not recognized: {breed}"),
            ),
            AgencyError::Conflict(_) | AgencyError::Assigned { .. } => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            AgencyError::ServiceUnavailable(_) => {
                error!(error = %err, "breed service failure");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "The breed reference service is unavailable.",
                )
            }
            _ => {
                error!(error = %err, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected request body");
        Self::new(StatusCode::BAD_REQUEST, INVALID_BODY)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected path parameters");
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AgencyError) -> StatusCode {
        ApiError::from(err).status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        assert_eq!(
            status_of(AgencyError::mission_not_found(1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AgencyError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AgencyError::MaxTargets {
                mission_id: 1,
                max: 3
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AgencyError::AgentBusy { agent_id: 7 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AgencyError::InvalidCategory("Tiger".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AgencyError::Conflict("done".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AgencyError::Assigned { mission_id: 1 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AgencyError::ServiceUnavailable("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AgencyError::Internal("oops".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = ApiError::from(AgencyError::Internal("password=hunter2".into()));
        assert_eq!(err.message(), INTERNAL);

        let err = ApiError::from(AgencyError::agent_not_found(12));
        assert_eq!(err.message(), NOT_FOUND);
    }

    #[test]
    fn test_business_rejections_keep_their_reason() {
        let err = ApiError::from(AgencyError::AgentBusy { agent_id: 7 });
        assert!(err.message().contains("already assigned"));
    }
}
