use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::identity::errors::IdentityError;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::ports::UserRepository;

/// In-memory user store for integration tests and local development.
///
/// Email uniqueness is checked while holding the write lock, so it gives
/// the same atomic find-or-create guarantee as the database constraint.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, IdentityError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| existing.email == user.email)
        {
            return Err(IdentityError::DuplicateEmail(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn set_reset_token(&self, id: &UserId, token: &str) -> Result<(), IdentityError> {
        let mut users = self.users.write().await;

        let user = users
            .get_mut(&id.0)
            .ok_or_else(|| IdentityError::Database(format!("No user record for id {}", id)))?;

        user.reset_token = Some(token.to_string());
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<bool, IdentityError> {
        let mut users = self.users.write().await;

        let Some(user) = users
            .values_mut()
            .find(|user| user.reset_token.as_deref() == Some(token))
        else {
            return Ok(false);
        };

        user.password_hash = password_hash.to_string();
        user.reset_token = None;
        Ok(true)
    }
}
