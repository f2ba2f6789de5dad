//! Agency Repository
//!
//! Locations are agencies whose `parent_id` points at their agency.

use sqlx::SqlitePool;

use super::RepoResult;
use shared::models::Agency;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Agency>> {
    let agency = sqlx::query_as::<_, Agency>(
        "SELECT id, name, parent_id, created_at FROM agency WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(agency)
}

pub async fn create(pool: &SqlitePool, name: &str, parent_id: Option<i64>) -> RepoResult<Agency> {
    let now = shared::util::now_millis();
    let agency = sqlx::query_as::<_, Agency>(
        "INSERT INTO agency (name, parent_id, created_at) VALUES (?, ?, ?) \
         RETURNING id, name, parent_id, created_at",
    )
    .bind(name)
    .bind(parent_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(agency)
}
