use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{self, PasswordError};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Account;
use crate::database::is_unique_violation;
use crate::types::Role;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account not found")]
    NotFound,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    Inactive,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Accounts cannot delete themselves")]
    SelfDeletion,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Manager(#[from] DatabaseError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Account CRUD and credential checks against the accounts table.
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub async fn new() -> Result<Self, AccountError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create an account with a hashed password. Email uniqueness is
    /// case-insensitive and enforced by the database, so a racing
    /// duplicate still comes back as `DuplicateEmail`.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        plain_password: &str,
        role: Role,
    ) -> Result<Account, AccountError> {
        let password_hash = password::hash_password(plain_password)?;

        let result = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(account) => Ok(account),
            Err(err) if is_unique_violation(&err) => Err(AccountError::DuplicateEmail),
            Err(err) => Err(err.into()),
        }
    }

    /// Verify login credentials. The password is checked before the
    /// active flag so a deactivation notice never leaks to someone who
    /// does not know the password.
    pub async fn authenticate(&self, email: &str, plain_password: &str) -> Result<Account, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

        if !password::verify_password(plain_password, &account.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }
        if !account.is_active {
            return Err(AccountError::Inactive);
        }

        Ok(account)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Account, AccountError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts ORDER BY created_at, email",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// Admin update of profile fields; `None` leaves a field unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> Result<Account, AccountError> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = COALESCE($2, name),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(role.map(|r| r.as_str()))
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AccountError::NotFound)
    }

    /// Change a password after verifying the current one.
    pub async fn change_password(
        &self,
        id: Uuid,
        current: &str,
        replacement: &str,
    ) -> Result<(), AccountError> {
        let account = self.get_by_id(id).await?;

        if !password::verify_password(current, &account.password_hash)? {
            return Err(AccountError::WrongPassword);
        }

        let password_hash = password::hash_password(replacement)?;
        sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(&password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete an account. Self-deletion is refused before anything is
    /// touched; class and record references go to NULL via the schema.
    pub async fn delete(&self, id: Uuid, caller_id: Uuid) -> Result<(), AccountError> {
        if id == caller_id {
            return Err(AccountError::SelfDeletion);
        }

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound);
        }

        Ok(())
    }
}
