use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password input rule violations (checked before hashing)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for outbound mail dispatch
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to dispatch mail: {0}")]
    Dispatch(String),
}

/// Top-level error for all identity operations.
///
/// `InvalidCredentials` is deliberately generic: it never distinguishes an
/// unknown email from a wrong password.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordRuleError),

    // Domain-level errors
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Mail dispatch failed: {0}")]
    MailDispatch(String),

    // Infrastructure errors
    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Token signing error: {0}")]
    TokenSigning(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<MailerError> for IdentityError {
    fn from(err: MailerError) -> Self {
        IdentityError::MailDispatch(err.to_string())
    }
}

impl From<auth::PasswordError> for IdentityError {
    fn from(err: auth::PasswordError) -> Self {
        IdentityError::Hashing(err.to_string())
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Unknown(err.to_string())
    }
}
