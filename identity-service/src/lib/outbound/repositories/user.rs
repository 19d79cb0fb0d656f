use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::identity::errors::IdentityError;
use crate::identity::models::EmailAddress;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    reset_token: Option<String>,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, IdentityError> {
        Ok(User {
            id: UserId(self.id),
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            reset_token: self.reset_token,
            is_admin: self.is_admin,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, reset_token, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.reset_token)
        .bind(user.is_admin)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return IdentityError::DuplicateEmail(user.email.as_str().to_string());
                }
            }
            IdentityError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, reset_token, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Database(e.to_string()))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn set_reset_token(&self, id: &UserId, token: &str) -> Result<(), IdentityError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $2
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| IdentityError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::Database(format!(
                "No user record for id {}",
                id
            )));
        }

        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<bool, IdentityError> {
        // Single statement: replacing the hash and clearing the token
        // cannot be observed separately, and a token can only be consumed
        // once even under concurrent completions.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token = NULL
            WHERE reset_token = $1
            "#,
        )
        .bind(token)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| IdentityError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
