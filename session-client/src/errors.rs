use thiserror::Error;

/// Error type for durable client-state writes.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to write durable state: {0}")]
    WriteFailed(String),
}

/// Error type for the silent-refresh network call.
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    #[error("Refresh request timed out")]
    Timeout,

    #[error("Refresh rejected with status {0}")]
    Rejected(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed refresh response: {0}")]
    MalformedResponse(String),
}

/// Error type for bootstrap misuse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("Bootstrap already ran for this application load")]
    AlreadyStarted,
}
