//! Data point queries

use sqlx::SqlitePool;
use tracing::info;

use super::models::{Category, DataPoint, DataPointListing, NewDataPoint};
use crate::{Error, Result};

#[derive(sqlx::FromRow)]
struct DataPointRow {
    id: i64,
    controversy_id: i64,
    name: String,
    description: String,
    url: String,
    data_set: String,
    boolean: bool,
}

impl TryFrom<DataPointRow> for DataPoint {
    type Error = Error;

    fn try_from(row: DataPointRow) -> Result<Self> {
        let category = row.data_set.parse::<Category>().map_err(|_| {
            Error::Internal(format!(
                "data point {} has unknown category '{}'",
                row.id, row.data_set
            ))
        })?;

        Ok(DataPoint {
            id: row.id,
            controversy_id: row.controversy_id,
            name: row.name,
            description: row.description,
            url: row.url,
            category,
            boolean: row.boolean,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, controversy_id, name, description, url, data_set, boolean FROM data_point";

/// Points of one controversy in insertion order
pub async fn list_data_points_for(pool: &SqlitePool, controversy_id: i64) -> Result<Vec<DataPoint>> {
    let rows = sqlx::query_as::<_, DataPointRow>(&format!(
        "{} WHERE controversy_id = ? ORDER BY id",
        SELECT_COLUMNS
    ))
    .bind(controversy_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(DataPoint::try_from).collect()
}

/// Every data point with its controversy name, for the admin list
pub async fn list_all_data_points(pool: &SqlitePool) -> Result<Vec<DataPointListing>> {
    let rows = sqlx::query_as::<_, (i64, i64, String, String, String, String, bool, String)>(
        r#"
        SELECT p.id, p.controversy_id, p.name, p.description, p.url,
               p.data_set, p.boolean, c.name
        FROM data_point p
        JOIN controversy c ON c.id = p.controversy_id
        ORDER BY c.name, p.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(
            |(id, controversy_id, name, description, url, data_set, boolean, controversy_name)|
             -> Result<DataPointListing> {
                let point = DataPoint::try_from(DataPointRow {
                    id,
                    controversy_id,
                    name,
                    description,
                    url,
                    data_set,
                    boolean,
                })?;
                Ok(DataPointListing {
                    point,
                    controversy_name,
                })
            },
        )
        .collect()
}

pub async fn get_data_point(pool: &SqlitePool, id: i64) -> Result<DataPoint> {
    let row = sqlx::query_as::<_, DataPointRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("data point {}", id)))?;

    DataPoint::try_from(row)
}

pub async fn create_data_point(pool: &SqlitePool, new: &NewDataPoint) -> Result<DataPoint> {
    let row = sqlx::query_as::<_, DataPointRow>(
        r#"
        INSERT INTO data_point (controversy_id, name, description, url, data_set, boolean)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, controversy_id, name, description, url, data_set, boolean
        "#,
    )
    .bind(new.controversy_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.url)
    .bind(new.category.as_str())
    .bind(new.boolean)
    .fetch_one(pool)
    .await
    .map_err(|e| map_missing_parent(e, new.controversy_id))?;

    let point = DataPoint::try_from(row)?;
    info!(
        "Created data point '{}' (id {}) for controversy {}",
        point.name, point.id, point.controversy_id
    );
    Ok(point)
}

pub async fn update_data_point(pool: &SqlitePool, id: i64, changes: &NewDataPoint) -> Result<DataPoint> {
    let row = sqlx::query_as::<_, DataPointRow>(
        r#"
        UPDATE data_point
        SET controversy_id = ?, name = ?, description = ?, url = ?, data_set = ?, boolean = ?
        WHERE id = ?
        RETURNING id, controversy_id, name, description, url, data_set, boolean
        "#,
    )
    .bind(changes.controversy_id)
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.url)
    .bind(changes.category.as_str())
    .bind(changes.boolean)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_missing_parent(e, changes.controversy_id))?
    .ok_or_else(|| Error::NotFound(format!("data point {}", id)))?;

    DataPoint::try_from(row)
}

pub async fn delete_data_point(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM data_point WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("data point {}", id)));
    }

    info!("Deleted data point {}", id);
    Ok(())
}

fn map_missing_parent(e: sqlx::Error, controversy_id: i64) -> Error {
    match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            Error::NotFound(format!("controversy {}", controversy_id))
        }
        other => Error::Database(other),
    }
}
