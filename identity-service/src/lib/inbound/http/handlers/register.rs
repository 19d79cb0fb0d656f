use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::identity::models::EmailAddress;
use crate::identity::models::Password;
use crate::identity::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .identity_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterResponseData {
                    message: "Register successful".to_string(),
                    user: user.into(),
                },
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
}

impl RegisterRequest {
    /// Validate both fields, collecting every violation into a
    /// field -> message map so the caller sees all problems at once.
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let mut fields = HashMap::new();

        let email = match EmailAddress::new(self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                fields.insert("email".to_string(), e.to_string());
                None
            }
        };

        let password = match Password::new(self.password) {
            Ok(password) => Some(password),
            Err(e) => {
                fields.insert("password".to_string(), e.to_string());
                None
            }
        };

        match (email, password) {
            (Some(email), Some(password)) => Ok(RegisterCommand::new(email, password)),
            _ => Err(ApiError::ValidationFailed(fields)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    pub user: UserData,
}
