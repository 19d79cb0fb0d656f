use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::Password;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<ResetPasswordResponseData>, ApiError> {
    // A bad replacement password is the caller's mistake, same status
    // class as a stale token
    let password = Password::new(body.password).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .identity_service
        .complete_password_reset(&body.token, password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ResetPasswordResponseData {
            message: "Password changed successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    password: String,
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPasswordResponseData {
    pub message: String,
}
