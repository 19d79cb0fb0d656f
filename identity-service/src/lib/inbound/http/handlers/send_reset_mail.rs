use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// The response is identical whether or not the email belongs to an
/// account, matching the generic-failure policy used for login.
pub async fn send_reset_mail(
    State(state): State<AppState>,
    Json(body): Json<SendResetMailRequest>,
) -> Result<ApiSuccess<SendResetMailResponseData>, ApiError> {
    state
        .identity_service
        .request_password_reset(&body.email)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SendResetMailResponseData {
            message: "If the account exists, a reset mail has been sent".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendResetMailRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendResetMailResponseData {
    pub message: String,
}
