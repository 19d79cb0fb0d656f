use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by both access and refresh tokens.
///
/// The subject is the user identifier; nothing else about the user is
/// embedded in the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a subject expiring `ttl` from now.
    pub fn for_subject(sub: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: sub.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Check whether the claims are expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
