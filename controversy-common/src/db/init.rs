//! Database initialization
//!
//! Creates the database file on first run, enables foreign-key enforcement
//! on every pooled connection and brings the schema up to date.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Set per connection: a one-off PRAGMA would only reach a single
    // pooled connection and leave the others without FK enforcement.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema_version_table(&pool).await?;
    create_controversy_table(&pool).await?;
    create_data_point_table(&pool).await?;

    crate::db::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_controversy_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS controversy (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 200),
            description TEXT NOT NULL DEFAULT '',
            slug TEXT NOT NULL UNIQUE CHECK (length(slug) BETWEEN 1 AND 50)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Index page lists by name
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_controversy_name ON controversy(name)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_data_point_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS data_point (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            controversy_id INTEGER NOT NULL
                REFERENCES controversy(id) ON DELETE RESTRICT,
            name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 32),
            description TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL CHECK (length(url) <= 200),
            data_set TEXT NOT NULL DEFAULT 'data'
                CHECK (data_set IN ('data', 'opinion', 'advice')),
            boolean INTEGER NOT NULL CHECK (boolean IN (0, 1))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_data_point_controversy ON data_point(controversy_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
