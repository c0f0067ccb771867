use crate::errors::{DbError, DbResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

// Embed all migration SQL files at compile time
const MIGRATION_PLATFORM: &str = include_str!("../migrations/20250601000000_platform.sql");

// List of migrations with their names and SQL content, oldest first
const MIGRATIONS: &[(&str, &str)] = &[
    ("20250601000000_platform.sql", MIGRATION_PLATFORM),
];

/// Open a pool with foreign keys enforced (the schema relies on `ON DELETE`).
pub async fn connect(database_url: &str) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(DbError::from)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(DbError::from)
}

/// Apply every migration that has not been recorded yet
pub async fn initialize_database(pool: &SqlitePool) -> DbResult<()> {
    create_migrations_table(pool).await?;

    let last_migration = get_last_migration(pool).await?;
    match &last_migration {
        Some(name) => log::info!("Last applied migration: {}", name),
        None => log::info!("No migrations applied yet"),
    }

    apply_pending_migrations(pool, last_migration).await
}

async fn create_migrations_table(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )"
    )
    .execute(pool)
    .await
    .map_err(|e| DbError::Migration(format!("Failed to create migrations table: {}", e)))?;

    Ok(())
}

async fn get_last_migration(pool: &SqlitePool) -> DbResult<Option<String>> {
    sqlx::query_scalar::<_, String>("SELECT name FROM migrations ORDER BY id DESC LIMIT 1")
        .fetch_optional(pool)
        .await
        .map_err(|e| DbError::Migration(format!("Failed to get last migration: {}", e)))
}

async fn apply_pending_migrations(pool: &SqlitePool, last_migration: Option<String>) -> DbResult<()> {
    let pending = pending_migrations(last_migration.as_deref());
    if pending.is_empty() {
        log::info!("No pending migrations to apply");
        return Ok(());
    }

    let mut tx = pool.begin().await
        .map_err(|e| DbError::Transaction(format!("Failed to begin transaction: {}", e)))?;

    for (migration_name, migration_sql) in pending {
        log::info!("Applying migration: {}", migration_name);

        sqlx::query(migration_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::Migration(format!("Failed to apply migration {}: {}", migration_name, e)))?;

        sqlx::query("INSERT INTO migrations (name, applied_at) VALUES (?, ?)")
            .bind(migration_name)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::Migration(format!("Failed to record migration {}: {}", migration_name, e)))?;
    }

    tx.commit().await
        .map_err(|e| DbError::Transaction(format!("Failed to commit migrations: {}", e)))?;

    log::info!("All migrations applied and committed successfully");
    Ok(())
}

/// Migrations after `last_migration`, or all of them on a fresh database
fn pending_migrations(last_migration: Option<&str>) -> Vec<(&'static str, &'static str)> {
    match last_migration {
        None => MIGRATIONS.to_vec(),
        Some(last) => MIGRATIONS
            .iter()
            .skip_while(|(name, _)| *name != last)
            .skip(1)
            .copied()
            .collect(),
    }
}

/// Fresh in-memory database with the schema applied, for tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:").await.expect("in-memory sqlite");
    initialize_database(&pool).await.expect("migrations apply");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_after_last_applied() {
        assert_eq!(pending_migrations(None).len(), MIGRATIONS.len());
        assert!(pending_migrations(Some("20250601000000_platform.sql")).is_empty());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = test_pool().await;
        initialize_database(&pool).await.unwrap();
        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }
}
