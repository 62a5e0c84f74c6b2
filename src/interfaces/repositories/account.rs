use async_trait::async_trait;
use std::borrow::Cow;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::account::{Account, AccountInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxAccountRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    /// Inserts the account and returns its id. A duplicate active email
    /// surfaces as `Conflict`.
    async fn create_account(&self, account: &AccountInsert) -> Result<Uuid, AppError>;
    /// Updates the moderation flag and returns the row, or `None` when no
    /// such account exists. Setting the current value again is a no-op.
    async fn set_blocked(&self, id: &Uuid, blocked: bool) -> Result<Option<Account>, AppError>;
}

impl SqlxAccountRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAccountRepo { pool }
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn create_account(&self, account: &AccountInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, role, is_blocked, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(account.is_blocked)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("An account with this email already exists".into())
            }
            _ => AppError::from(err),
        })?;

        Ok(id)
    }

    async fn set_blocked(&self, id: &Uuid, blocked: bool) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE users
            SET is_blocked = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
