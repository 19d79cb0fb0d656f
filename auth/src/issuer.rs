use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Access + refresh token pair returned on login.
///
/// Never persisted; the access token is held in memory by the client and
/// the refresh token goes into a durable cookie-like store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and validates the two-token credential scheme.
///
/// Access and refresh tokens are signed with distinct secrets. A verified
/// refresh token's subject is the only input used to mint a new access
/// token; no password is involved and the refresh token is not rotated.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the two signing secrets and token lifetimes.
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a fresh access + refresh pair for a subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        let access_token = self.issue_access_token(subject)?;
        let refresh_token = self
            .refresh
            .encode(&Claims::for_subject(subject, self.refresh_ttl))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Issue a new access token for a subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access_token(&self, subject: &str) -> Result<String, JwtError> {
        self.access
            .encode(&Claims::for_subject(subject, self.access_ttl))
    }

    /// Validate a refresh token and mint a new access token for its
    /// subject.
    ///
    /// # Errors
    /// * `TokenExpired` - Refresh token has expired
    /// * `InvalidToken` - Signature invalid or token malformed
    /// * `EncodingFailed` - New access token could not be signed
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, JwtError> {
        let claims: Claims = self.refresh.decode(refresh_token)?;
        self.issue_access_token(&claims.sub)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Access token has expired
    /// * `InvalidToken` - Signature invalid or token malformed
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.access.decode(token)
    }
}
