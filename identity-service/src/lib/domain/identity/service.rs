use std::sync::Arc;

use async_trait::async_trait;
use auth::JwtError;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::identity::errors::IdentityError;
use crate::identity::models::AuthenticatedUser;
use crate::identity::models::LoginCommand;
use crate::identity::models::Password;
use crate::identity::models::RegisterCommand;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::Mailer;
use crate::identity::ports::UserRepository;

const RESET_TOKEN_LENGTH: usize = 32;

/// Domain service implementation for identity operations.
///
/// Stateless per request: all state lives in the repository or inside the
/// signed tokens themselves. Argon2 work is pushed onto the blocking pool
/// so a slow derivation never stalls other requests' I/O.
pub struct IdentityService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    repository: Arc<UR>,
    mailer: Arc<M>,
    tokens: Arc<TokenIssuer>,
    reset_link_base: String,
}

impl<UR, M> IdentityService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    /// Create a new identity service with injected adapters.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `mailer` - Outbound mail implementation
    /// * `tokens` - Two-secret token issuer
    /// * `reset_link_base` - Frontend base URL embedded in reset links
    pub fn new(
        repository: Arc<UR>,
        mailer: Arc<M>,
        tokens: Arc<TokenIssuer>,
        reset_link_base: String,
    ) -> Self {
        Self {
            repository,
            mailer,
            tokens,
            reset_link_base,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, IdentityError> {
        let hash = tokio::task::spawn_blocking(move || {
            PasswordHasher::new().hash(password.as_str())
        })
        .await
        .map_err(|e| IdentityError::Unknown(format!("Hashing task failed: {}", e)))??;

        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, IdentityError> {
        let matches = tokio::task::spawn_blocking(move || {
            PasswordHasher::new().verify(&password, &stored_hash)
        })
        .await
        .map_err(|e| IdentityError::Unknown(format!("Verification task failed: {}", e)))??;

        Ok(matches)
    }

    fn generate_reset_token() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl<UR, M> IdentityServicePort for IdentityService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, IdentityError> {
        // Hash before persistence, always
        let password_hash = self.hash_password(command.password).await?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            reset_token: None,
            is_admin: false,
            created_at: Utc::now(),
        };

        let created = self.repository.create(user).await?;

        tracing::info!(user_id = %created.id, "User registered");

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, IdentityError> {
        let user = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let matches = self
            .verify_password(command.password, user.password_hash.clone())
            .await?;
        if !matches {
            return Err(IdentityError::InvalidCredentials);
        }

        let pair = self
            .tokens
            .issue_pair(&user.id.to_string())
            .map_err(|e| IdentityError::TokenSigning(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(AuthenticatedUser {
            user,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    async fn refresh_access_token(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<String, IdentityError> {
        let token = refresh_token.ok_or(IdentityError::MissingRefreshToken)?;

        self.tokens.refresh_access_token(token).map_err(|e| match e {
            JwtError::TokenExpired | JwtError::InvalidToken(_) => {
                tracing::warn!("Refresh token rejected: {}", e);
                IdentityError::InvalidRefreshToken
            }
            JwtError::EncodingFailed(msg) => IdentityError::TokenSigning(msg),
        })
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            // Same outcome as the found case: no account enumeration
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = Self::generate_reset_token();
        self.repository.set_reset_token(&user.id, &token).await?;

        let link = format!("{}/resetPassword?token={}", self.reset_link_base, token);
        self.mailer.send_reset_link(&user.email, &link).await?;

        tracing::info!(user_id = %user.id, "Reset mail dispatched");

        Ok(())
    }

    async fn complete_password_reset(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<(), IdentityError> {
        // Hash before persistence, always
        let password_hash = self.hash_password(new_password).await?;

        let consumed = self
            .repository
            .consume_reset_token(token, &password_hash)
            .await?;

        if !consumed {
            return Err(IdentityError::InvalidResetToken);
        }

        tracing::info!("Password reset completed");

        Ok(())
    }
}
