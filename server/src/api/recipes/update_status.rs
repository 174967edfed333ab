use crate::api::json::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::get_conn;
use crate::recipes::review::change_status;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tastecheck_core::{ReviewEvent, ValidationError, VerificationStatus};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Target status: verified, needs_revision or pending_verification
    #[schema(value_type = VerificationStatus)]
    pub status: String,
    /// Revision notes; required when sending a recipe back
    #[serde(default, alias = "healthTips")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub recipe_id: i32,
    pub status: VerificationStatus,
}

impl UpdateStatusRequest {
    fn event(&self) -> Result<ReviewEvent, ValidationError> {
        let target = VerificationStatus::parse(self.status.trim()).ok_or_else(|| {
            ValidationError::single(format!("Unknown status '{}'", self.status.trim()))
        })?;
        Ok(ReviewEvent::toward(target, self.notes.clone()))
    }
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/update-status",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = UpdateStatusResponse),
        (status = 400, description = "Transition not allowed from the current status, or missing notes", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only nutritionists can verify or request revisions", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_status(
    AuthUser(actor): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> impl IntoResponse {
    let event = match request.event() {
        Ok(event) => event,
        Err(e) => return AppError::from(e).into_response(),
    };

    let mut conn = get_conn!(pool);

    match change_status(&mut conn, id, &actor, &event) {
        Ok(transition) => Json(UpdateStatusResponse {
            recipe_id: id,
            status: transition.to,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> UpdateStatusRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_maps_to_event() {
        assert_eq!(
            request(r#"{"status":"verified"}"#).event(),
            Ok(ReviewEvent::Verify)
        );
        assert_eq!(
            request(r#"{"status":"pending_verification"}"#).event(),
            Ok(ReviewEvent::Resubmit)
        );
        assert_eq!(
            request(r#"{"status":"needs_revision","notes":"Add salt amount"}"#).event(),
            Ok(ReviewEvent::RequestRevision {
                notes: "Add salt amount".to_string()
            })
        );
    }

    #[test]
    fn test_health_tips_alias() {
        assert_eq!(
            request(r#"{"status":"needs_revision","healthTips":"Less butter"}"#).event(),
            Ok(ReviewEvent::RequestRevision {
                notes: "Less butter".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_status_is_a_validation_error() {
        let err = request(r#"{"status":"approved"}"#).event().unwrap_err();
        assert_eq!(err.problems, vec!["Unknown status 'approved'"]);
    }
}
