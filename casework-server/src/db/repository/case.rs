//! Case Repository

use sqlx::SqlitePool;

use super::RepoResult;
use shared::models::{Case, CaseCreate};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Case>> {
    let case = sqlx::query_as::<_, Case>(
        "SELECT id, agency_id, location_id, first_name, last_name, date_of_birth, \
         created_by, created_at FROM client_case WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(case)
}

pub async fn create(
    pool: &SqlitePool,
    agency_id: i64,
    created_by: i64,
    data: &CaseCreate,
) -> RepoResult<Case> {
    let now = shared::util::now_millis();
    let case = sqlx::query_as::<_, Case>(
        "INSERT INTO client_case (agency_id, location_id, first_name, last_name, \
         date_of_birth, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, agency_id, location_id, first_name, last_name, date_of_birth, \
         created_by, created_at",
    )
    .bind(agency_id)
    .bind(data.location_id)
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(data.date_of_birth)
    .bind(created_by)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(case)
}
