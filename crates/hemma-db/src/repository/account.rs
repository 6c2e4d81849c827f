//! # Account Repository
//!
//! Database operations for registered accounts.
//!
//! ## Key Operations
//! - Insert on registration
//! - Lookup by email (duplicate check)
//! - Lookup by exact (email, password) pair (sign-in)
//!
//! Passwords are compared as stored, in plaintext.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hemma_core::{Account, AccountId, NewAccount};

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts a new account and returns its assigned id.
    ///
    /// ## Returns
    /// * `Ok(id)` - Account stored
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, account: &NewAccount) -> DbResult<AccountId> {
        debug!(email = %account.email, "Inserting account");

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (name, email, password)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &account.email),
            other => other,
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Finds an account by email.
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with that email
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password
            FROM accounts
            WHERE email = ?1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by exact email and password match.
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Credentials match
    /// * `Ok(None)` - Unknown email or wrong password
    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DbResult<Option<Account>> {
        debug!(email = %email, "Looking up credentials");

        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password
            FROM accounts
            WHERE email = ?1 AND password = ?2
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Counts registered accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
