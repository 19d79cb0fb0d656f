use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::identity::errors::IdentityError;
use crate::identity::models::User;

pub mod login;
pub mod refresh_token;
pub mod register;
pub mod reset_password;
pub mod send_reset_mail;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Forbidden(String),
    InternalServerError(String),
    ValidationFailed(HashMap<String, String>),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => error_response(StatusCode::FORBIDDEN, msg),
            ApiError::InternalServerError(msg) => {
                // Logged server-side; the caller only sees a generic message
                tracing::error!("Internal error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            ApiError::ValidationFailed(fields) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    Json(ApiResponseBody::new(
                        status,
                        ValidationErrorData {
                            error: "Validation error".to_string(),
                            fields,
                        },
                    )),
                )
                    .into_response()
            }
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ApiResponseBody::new_error(status, message))).into_response()
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateEmail(_) | IdentityError::InvalidCredentials => {
                ApiError::BadRequest(err.to_string())
            }
            IdentityError::InvalidResetToken => ApiError::BadRequest(err.to_string()),
            IdentityError::MissingRefreshToken | IdentityError::InvalidRefreshToken => {
                ApiError::Forbidden(err.to_string())
            }
            IdentityError::InvalidUserId(_)
            | IdentityError::InvalidEmail(_)
            | IdentityError::InvalidPassword(_)
            | IdentityError::MailDispatch(_)
            | IdentityError::Hashing(_)
            | IdentityError::TokenSigning(_)
            | IdentityError::Database(_)
            | IdentityError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrorData {
    pub error: String,
    pub fields: HashMap<String, String>,
}

/// Sanitized user payload: never carries the password hash or reset token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
