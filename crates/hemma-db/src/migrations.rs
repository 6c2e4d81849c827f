//! # Database Migrations
//!
//! Embedded SQL migrations for Hemma.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs _sqlx_migrations                       │
//! │       │                                                                 │
//! │       ├── Pending? ─────────────► run them in order                    │
//! │       │                                                                 │
//! │       ├── History disagrees? ───► (rebuild enabled)                    │
//! │       │   checksum changed,         drop every table                   │
//! │       │   version vanished,         run all migrations again           │
//! │       │   dirty migration           LOCAL DATA IS LOST                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  App continues startup                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Losing accounts and favorites on a schema change is accepted: the device
//! store is a cache of a demo catalog plus local registrations.

use sqlx::migrate::MigrateError;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// ## Behavior
/// - Idempotent: safe to run multiple times
/// - With `rebuild_on_mismatch`, an incompatible history triggers
///   [`rebuild_schema`] followed by a fresh run
pub async fn run_migrations(pool: &SqlitePool, rebuild_on_mismatch: bool) -> DbResult<()> {
    info!("Checking for pending migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {}
        Err(err) if rebuild_on_mismatch && is_schema_mismatch(&err) => {
            warn!(error = %err, "Schema history does not match, rebuilding database");
            rebuild_schema(pool).await?;
            MIGRATOR.run(pool).await?;
        }
        Err(err) => return Err(err.into()),
    }

    info!("All migrations applied successfully");
    Ok(())
}

/// Drops every user table, including the migration history.
///
/// ## Warning
/// Destroys all stored accounts and products.
pub async fn rebuild_schema(pool: &SqlitePool) -> DbResult<()> {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(pool)
    .await?;

    for table in &tables {
        let sql = format!("DROP TABLE IF EXISTS \"{}\"", table.replace('"', "\"\""));
        sqlx::query(&sql).execute(pool).await?;
    }

    warn!(dropped = tables.len(), "Dropped all tables");
    Ok(())
}

/// Returns information about migrations.
///
/// ## Returns
/// Tuple of (total_migrations, applied_migrations)
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}

/// Errors that mean the stored schema came from a different build.
fn is_schema_mismatch(err: &MigrateError) -> bool {
    matches!(
        err,
        MigrateError::VersionMismatch(_) | MigrateError::VersionMissing(_) | MigrateError::Dirty(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_status_reports_store_errors() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(migration_status(db.pool()).await.is_err());
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        run_migrations(db.pool(), false).await.unwrap();
        run_migrations(db.pool(), false).await.unwrap();
    }

    #[tokio::test]
    async fn test_checksum_mismatch_rebuilds() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&hemma_core::NewProduct::new(
                "Lamp",
                hemma_core::Money::from_cents(1200),
                "Lighting",
                None,
            ))
            .await
            .unwrap();

        // Simulate a database written by a build with a different schema.
        sqlx::query("UPDATE _sqlx_migrations SET checksum = x'00'")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(run_migrations(db.pool(), false).await.is_err());

        run_migrations(db.pool(), true).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 0);
    }
}
