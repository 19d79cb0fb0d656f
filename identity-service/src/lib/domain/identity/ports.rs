use async_trait::async_trait;

use crate::identity::errors::IdentityError;
use crate::identity::errors::MailerError;
use crate::identity::models::AuthenticatedUser;
use crate::identity::models::EmailAddress;
use crate::identity::models::LoginCommand;
use crate::identity::models::Password;
use crate::identity::models::RegisterCommand;
use crate::identity::models::User;
use crate::identity::models::UserId;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new user. The password is hashed before the record is
    /// persisted; duplicate detection relies on the store's uniqueness
    /// constraint, not a prior existence check.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Database` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, IdentityError>;

    /// Authenticate and issue an access + refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (never
    ///   distinguished)
    /// * `Database` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, IdentityError>;

    /// Validate a refresh token and mint a new access token for its
    /// subject. The refresh token is not rotated.
    ///
    /// # Errors
    /// * `MissingRefreshToken` - No token supplied
    /// * `InvalidRefreshToken` - Bad signature or expired
    async fn refresh_access_token(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<String, IdentityError>;

    /// Generate an opaque reset token for the account, persist it, and
    /// dispatch a reset link. Succeeds with no observable difference when
    /// the email is unknown.
    ///
    /// # Errors
    /// * `MailDispatch` - Mail could not be sent (reported, not retried)
    /// * `Database` - Store operation failed
    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    /// Consume a reset token and replace the account password. Tokens are
    /// single-use: consumption clears the stored token atomically.
    ///
    /// # Errors
    /// * `InvalidResetToken` - No outstanding reset with this token
    /// * `Database` - Store operation failed
    async fn complete_password_reset(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<(), IdentityError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user. Uniqueness of the email is enforced here, so a
    /// race between two registrations cannot produce two records.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Database` - Store operation failed
    async fn create(&self, user: User) -> Result<User, IdentityError>;

    /// Retrieve a user by email (case-sensitive exact match).
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError>;

    /// Attach an outstanding reset token to a user record, replacing any
    /// previous one.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn set_reset_token(&self, id: &UserId, token: &str) -> Result<(), IdentityError>;

    /// Atomically replace the password hash of the record holding this
    /// reset token and clear the token. Returns false when no record
    /// holds the token.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<bool, IdentityError>;
}

/// Outbound mail capability.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver a password-reset link to the address.
    ///
    /// # Errors
    /// * `Dispatch` - Delivery failed
    async fn send_reset_link(&self, to: &EmailAddress, link: &str) -> Result<(), MailerError>;
}
