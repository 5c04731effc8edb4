//! Controversy queries

use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{Controversy, NewControversy};
use crate::slug::validate_slug;
use crate::{Error, Result};

/// All controversies ordered by name
pub async fn list_controversies(pool: &SqlitePool) -> Result<Vec<Controversy>> {
    let rows = sqlx::query_as::<_, Controversy>(
        "SELECT id, name, description, slug FROM controversy ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_controversy(pool: &SqlitePool, id: i64) -> Result<Controversy> {
    sqlx::query_as::<_, Controversy>(
        "SELECT id, name, description, slug FROM controversy WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("controversy {}", id)))
}

pub async fn get_controversy_by_slug(pool: &SqlitePool, slug: &str) -> Result<Controversy> {
    sqlx::query_as::<_, Controversy>(
        "SELECT id, name, description, slug FROM controversy WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("controversy '{}'", slug)))
}

pub async fn create_controversy(pool: &SqlitePool, new: &NewControversy) -> Result<Controversy> {
    validate_slug(&new.slug)?;

    let created = sqlx::query_as::<_, Controversy>(
        r#"
        INSERT INTO controversy (name, description, slug)
        VALUES (?, ?, ?)
        RETURNING id, name, description, slug
        "#,
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.slug)
    .fetch_one(pool)
    .await
    .map_err(|e| map_slug_conflict(e, &new.slug))?;

    info!("Created controversy '{}' (id {})", created.slug, created.id);
    Ok(created)
}

pub async fn update_controversy(
    pool: &SqlitePool,
    id: i64,
    changes: &NewControversy,
) -> Result<Controversy> {
    validate_slug(&changes.slug)?;

    sqlx::query_as::<_, Controversy>(
        r#"
        UPDATE controversy SET name = ?, description = ?, slug = ?
        WHERE id = ?
        RETURNING id, name, description, slug
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.slug)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_slug_conflict(e, &changes.slug))?
    .ok_or_else(|| Error::NotFound(format!("controversy {}", id)))
}

/// Number of data points referencing a controversy
pub async fn count_data_points(pool: &SqlitePool, controversy_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM data_point WHERE controversy_id = ?")
        .bind(controversy_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a controversy that no data point references
///
/// Fails with [`Error::Protected`] while any data point still points at it.
/// The `ON DELETE RESTRICT` foreign key rejects the delete as well if a
/// point is added between the count and the delete.
pub async fn delete_controversy(pool: &SqlitePool, id: i64) -> Result<()> {
    let controversy = get_controversy(pool, id).await?;

    let referencing = count_data_points(pool, id).await?;
    if referencing > 0 {
        warn!(
            "Refusing to delete controversy '{}': {} data point(s) reference it",
            controversy.slug, referencing
        );
        return Err(protected(&controversy, referencing));
    }

    sqlx::query("DELETE FROM controversy WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                protected(&controversy, 1)
            }
            other => Error::Database(other),
        })?;

    info!("Deleted controversy '{}' (id {})", controversy.slug, id);
    Ok(())
}

fn protected(controversy: &Controversy, referencing: i64) -> Error {
    Error::Protected(format!(
        "controversy '{}' is referenced by {} data point(s)",
        controversy.name, referencing
    ))
}

fn map_slug_conflict(e: sqlx::Error, slug: &str) -> Error {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            Error::Conflict(format!("slug '{}' is already in use", slug))
        }
        other => Error::Database(other),
    }
}
