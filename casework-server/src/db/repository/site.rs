//! Site and Bed Repository

use sqlx::{Executor, Sqlite, SqlitePool};

use super::RepoResult;
use shared::bed::BedStatus;
use shared::models::{Bed, BedCreate, Site, SiteBedSummary, SiteCreate};

const SELECT_SITE: &str =
    "SELECT id, agency_id, location_id, name, address, created_at FROM site";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Site>> {
    let site = sqlx::query_as::<_, Site>(&format!("{SELECT_SITE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(site)
}

pub async fn create_site(pool: &SqlitePool, agency_id: i64, data: &SiteCreate) -> RepoResult<Site> {
    let now = shared::util::now_millis();
    let site = sqlx::query_as::<_, Site>(
        "INSERT INTO site (agency_id, location_id, name, address, created_at) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id, agency_id, location_id, name, address, created_at",
    )
    .bind(agency_id)
    .bind(data.location_id)
    .bind(data.name.trim())
    .bind(data.address.as_deref().map(str::trim))
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(site)
}

/// Works on a pool or inside an open transaction
pub async fn find_bed<'e, E>(executor: E, id: i64) -> RepoResult<Option<Bed>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let bed = sqlx::query_as::<_, Bed>(
        "SELECT id, site_id, name, room_name, bed_type, created_at FROM bed WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(bed)
}

pub async fn create_bed(pool: &SqlitePool, site_id: i64, data: &BedCreate) -> RepoResult<Bed> {
    let now = shared::util::now_millis();
    let bed = sqlx::query_as::<_, Bed>(
        "INSERT INTO bed (site_id, name, room_name, bed_type, created_at) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id, site_id, name, room_name, bed_type, created_at",
    )
    .bind(site_id)
    .bind(data.name.trim())
    .bind(data.room_name.as_deref().map(str::trim))
    .bind(data.bed_type.as_deref().map(str::trim))
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(bed)
}

/// Beds of the site with no active occupant
pub async fn available_beds(pool: &SqlitePool, site_id: i64) -> RepoResult<Vec<Bed>> {
    let beds = sqlx::query_as::<_, Bed>(
        "SELECT b.id, b.site_id, b.name, b.room_name, b.bed_type, b.created_at FROM bed b \
         WHERE b.site_id = ?1 AND NOT EXISTS ( \
             SELECT 1 FROM bed_assignment a WHERE a.bed_id = b.id AND a.status IN (?2, ?3)) \
         ORDER BY b.room_name, b.name",
    )
    .bind(site_id)
    .bind(BedStatus::ActiveOccupant)
    .bind(BedStatus::ScheduledCheckout)
    .fetch_all(pool)
    .await?;
    Ok(beds)
}

/// Per-site bed counts for an agency
///
/// With `location_id`, only sites of that location or agency-wide sites.
pub async fn bed_summary(
    pool: &SqlitePool,
    agency_id: i64,
    location_id: Option<i64>,
) -> RepoResult<Vec<SiteBedSummary>> {
    let rows = sqlx::query_as::<_, SiteBedSummary>(
        "SELECT s.id AS site_id, s.name AS site_name, \
             (SELECT COUNT(*) FROM bed b WHERE b.site_id = s.id) AS total_beds, \
             (SELECT COUNT(*) FROM bed_assignment a \
                 WHERE a.site_id = s.id AND a.status IN (?1, ?2)) AS occupied_beds, \
             (SELECT COUNT(*) FROM bed b WHERE b.site_id = s.id) - \
             (SELECT COUNT(*) FROM bed_assignment a \
                 WHERE a.site_id = s.id AND a.status IN (?1, ?2)) AS available_beds, \
             (SELECT COUNT(*) FROM bed_assignment a \
                 WHERE a.site_id = s.id AND a.status = ?3) AS pending_requests \
         FROM site s \
         WHERE s.agency_id = ?4 \
           AND (?5 IS NULL OR s.location_id IS NULL OR s.location_id = ?5) \
         ORDER BY s.name",
    )
    .bind(BedStatus::ActiveOccupant)
    .bind(BedStatus::ScheduledCheckout)
    .bind(BedStatus::Requested)
    .bind(agency_id)
    .bind(location_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
