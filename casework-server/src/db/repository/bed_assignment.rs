//! Bed Assignment Repository
//!
//! Each transition loads the record, applies the status machine, checks the
//! one-active-bed rules and writes with a status-guarded UPDATE inside one
//! immediate transaction. The partial unique indexes on `case_id` and
//! `bed_id` reject whatever a concurrent writer slips past.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteQueryResult;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, begin_immediate, site};
use shared::bed::validation::{
    AssignForm, CheckInForm, DenyForm, RequestForm, validate_check_out, validate_request_update,
    validate_schedule_checkout, validate_stay_update,
};
use shared::bed::{BedAction, BedStatus, InvalidTransition};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Bed, BedAssignment, BedCheckOut, BedRequestUpdate, BedScheduleCheckout, BedStayUpdate, Case,
    CheckInDetails, CheckOutDetails,
};

const SELECT_ASSIGNMENT: &str = "SELECT id, case_id, agency_id, location_id, site_id, bed_id, \
    status, arrival_date, request_notes, deny_reason, check_in_date, check_in_notes, bed_name, \
    room_name, bed_type, check_out_date, check_out_notes, scheduled_checkout_date, created_by, \
    created_at, updated_at FROM bed_assignment";

/// Flat table row; check-in and check-out details are column groups
#[derive(Debug, sqlx::FromRow)]
struct BedAssignmentRow {
    id: i64,
    case_id: i64,
    agency_id: i64,
    location_id: Option<i64>,
    site_id: i64,
    bed_id: Option<i64>,
    status: BedStatus,
    arrival_date: Option<NaiveDate>,
    request_notes: Option<String>,
    deny_reason: Option<String>,
    check_in_date: Option<NaiveDate>,
    check_in_notes: Option<String>,
    bed_name: Option<String>,
    room_name: Option<String>,
    bed_type: Option<String>,
    check_out_date: Option<NaiveDate>,
    check_out_notes: Option<String>,
    scheduled_checkout_date: Option<NaiveDate>,
    created_by: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<BedAssignmentRow> for BedAssignment {
    fn from(row: BedAssignmentRow) -> Self {
        let check_in_details = match (row.check_in_date, row.bed_id, row.bed_name) {
            (Some(check_in_date), Some(bed_id), Some(bed_name)) => Some(CheckInDetails {
                check_in_date,
                notes: row.check_in_notes,
                bed_id,
                bed_name,
                room_name: row.room_name,
                bed_type: row.bed_type,
            }),
            _ => None,
        };
        let check_out_details = row.check_out_date.map(|check_out_date| CheckOutDetails {
            check_out_date,
            notes: row.check_out_notes,
        });

        BedAssignment {
            id: row.id,
            case_id: row.case_id,
            agency_id: row.agency_id,
            location_id: row.location_id,
            site_id: row.site_id,
            bed_id: row.bed_id,
            status: row.status,
            arrival_date: row.arrival_date,
            request_notes: row.request_notes,
            deny_reason: row.deny_reason,
            check_in_details,
            check_out_details,
            scheduled_checkout_date: row.scheduled_checkout_date,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Listing filter; `None` fields do not restrict
///
/// `location_id` keeps agency-wide records (no location) visible.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub agency_id: Option<i64>,
    pub location_id: Option<i64>,
    pub case_id: Option<i64>,
    pub site_id: Option<i64>,
    pub status: Option<BedStatus>,
}

// ── Queries ─────────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<BedAssignment>> {
    let row = sqlx::query_as::<_, BedAssignmentRow>(&format!("{SELECT_ASSIGNMENT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(BedAssignment::from))
}

pub async fn find_all(pool: &SqlitePool, filter: &ListFilter) -> RepoResult<Vec<BedAssignment>> {
    let rows = sqlx::query_as::<_, BedAssignmentRow>(&format!(
        "{SELECT_ASSIGNMENT} \
         WHERE (?1 IS NULL OR agency_id = ?1) \
           AND (?2 IS NULL OR location_id IS NULL OR location_id = ?2) \
           AND (?3 IS NULL OR case_id = ?3) \
           AND (?4 IS NULL OR site_id = ?4) \
           AND (?5 IS NULL OR status = ?5) \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(filter.agency_id)
    .bind(filter.location_id)
    .bind(filter.case_id)
    .bind(filter.site_id)
    .bind(filter.status)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(BedAssignment::from).collect())
}

/// The case's ACTIVE OCCUPANT or SCHEDULED CHECKOUT record, if any
pub async fn find_active_for_case(
    pool: &SqlitePool,
    case_id: i64,
) -> RepoResult<Option<BedAssignment>> {
    let row = sqlx::query_as::<_, BedAssignmentRow>(&format!(
        "{SELECT_ASSIGNMENT} WHERE case_id = ? AND status IN (?, ?) LIMIT 1"
    ))
    .bind(case_id)
    .bind(BedStatus::ActiveOccupant)
    .bind(BedStatus::ScheduledCheckout)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(BedAssignment::from))
}

// ── Creation ────────────────────────────────────────────────────────

/// New REQUESTED record for `case`
pub async fn create_request(
    pool: &SqlitePool,
    case: &Case,
    form: &RequestForm,
    created_by: i64,
) -> RepoResult<BedAssignment> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO bed_assignment (case_id, agency_id, location_id, site_id, status, \
         arrival_date, request_notes, created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(case.id)
    .bind(case.agency_id)
    .bind(case.location_id)
    .bind(form.site_id)
    .bind(BedStatus::Requested)
    .bind(form.arrival_date)
    .bind(form.notes.as_deref())
    .bind(created_by)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    fetch(pool, id).await
}

/// Direct assignment: the case goes straight to ACTIVE OCCUPANT
pub async fn assign(
    pool: &SqlitePool,
    case: &Case,
    form: &AssignForm,
    created_by: i64,
) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;

    ensure_case_free(&mut tx, case.id).await?;
    let bed = bed_at_site(&mut tx, form.bed_id, form.site_id).await?;
    ensure_bed_free(&mut tx, bed.id, None).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO bed_assignment (case_id, agency_id, location_id, site_id, bed_id, status, \
         arrival_date, check_in_date, check_in_notes, bed_name, room_name, bed_type, \
         created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(case.id)
    .bind(case.agency_id)
    .bind(case.location_id)
    .bind(form.site_id)
    .bind(bed.id)
    .bind(BedStatus::ActiveOccupant)
    .bind(form.check_in_date)
    .bind(form.check_in_date)
    .bind(form.notes.as_deref())
    .bind(&bed.name)
    .bind(bed.room_name.as_deref())
    .bind(bed.bed_type.as_deref())
    .bind(created_by)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(active_conflict)?;

    tx.commit().await?;
    tracing::info!(assignment_id = id, case_id = case.id, bed_id = bed.id, "Bed assigned");
    fetch(pool, id).await
}

// ── Transitions ─────────────────────────────────────────────────────

/// REQUESTED → ACTIVE OCCUPANT, snapshotting the bed
pub async fn check_in(pool: &SqlitePool, id: i64, form: &CheckInForm) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;
    let current = load(&mut tx, id).await?;
    let next = current.status.apply(BedAction::CheckIn)?;

    ensure_case_free(&mut tx, current.case_id).await?;
    let bed = bed_at_site(&mut tx, form.bed_id, current.site_id).await?;
    ensure_bed_free(&mut tx, bed.id, None).await?;

    let result = sqlx::query(
        "UPDATE bed_assignment SET status = ?, bed_id = ?, check_in_date = ?, check_in_notes = ?, \
         bed_name = ?, room_name = ?, bed_type = ?, updated_at = ? \
         WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(bed.id)
    .bind(form.check_in_date)
    .bind(form.notes.as_deref())
    .bind(&bed.name)
    .bind(bed.room_name.as_deref())
    .bind(bed.bed_type.as_deref())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await
    .map_err(active_conflict)?;
    ensure_updated(&result, &current, BedAction::CheckIn)?;

    tx.commit().await?;
    tracing::info!(assignment_id = id, case_id = current.case_id, bed_id = bed.id, "Bed checked in");
    fetch(pool, id).await
}

/// ACTIVE OCCUPANT → SCHEDULED CHECKOUT
pub async fn schedule_checkout(
    pool: &SqlitePool,
    id: i64,
    payload: &BedScheduleCheckout,
) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;
    let current = load(&mut tx, id).await?;
    let next = current.status.apply(BedAction::ScheduleCheckout)?;
    let form = validate_schedule_checkout(payload, check_in_date(&current))?;

    let result = sqlx::query(
        "UPDATE bed_assignment SET status = ?, scheduled_checkout_date = ?, updated_at = ? \
         WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(form.scheduled_checkout_date)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await?;
    ensure_updated(&result, &current, BedAction::ScheduleCheckout)?;

    tx.commit().await?;
    fetch(pool, id).await
}

/// ACTIVE OCCUPANT / SCHEDULED CHECKOUT → CHECKEDIN-OUT; frees the bed
pub async fn check_out(
    pool: &SqlitePool,
    id: i64,
    payload: &BedCheckOut,
) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;
    let current = load(&mut tx, id).await?;
    let next = current.status.apply(BedAction::CheckOut)?;
    let form = validate_check_out(payload, check_in_date(&current))?;

    let result = sqlx::query(
        "UPDATE bed_assignment SET status = ?, check_out_date = ?, check_out_notes = ?, \
         updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(form.check_out_date)
    .bind(form.notes.as_deref())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await?;
    ensure_updated(&result, &current, BedAction::CheckOut)?;

    tx.commit().await?;
    tracing::info!(assignment_id = id, case_id = current.case_id, "Bed checked out");
    fetch(pool, id).await
}

/// REQUESTED → DENIED
pub async fn deny(pool: &SqlitePool, id: i64, form: &DenyForm) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;
    let current = load(&mut tx, id).await?;
    let next = current.status.apply(BedAction::Deny)?;

    let result = sqlx::query(
        "UPDATE bed_assignment SET status = ?, deny_reason = ?, updated_at = ? \
         WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(&form.reason)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await?;
    ensure_updated(&result, &current, BedAction::Deny)?;

    tx.commit().await?;
    fetch(pool, id).await
}

// ── Edits ───────────────────────────────────────────────────────────

/// Site, arrival date and notes of a REQUESTED or DENIED record
pub async fn update_request(
    pool: &SqlitePool,
    id: i64,
    payload: &BedRequestUpdate,
) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;
    let current = load(&mut tx, id).await?;
    current.status.apply(BedAction::EditRequest)?;
    let form = validate_request_update(payload, &current)?;

    if form.site_id != current.site_id {
        ensure_site_in_agency(&mut tx, form.site_id, current.agency_id).await?;
    }

    let result = sqlx::query(
        "UPDATE bed_assignment SET site_id = ?, arrival_date = ?, request_notes = ?, updated_at = ? \
         WHERE id = ? AND status = ?",
    )
    .bind(form.site_id)
    .bind(form.arrival_date)
    .bind(form.notes.as_deref())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await?;
    ensure_updated(&result, &current, BedAction::EditRequest)?;

    tx.commit().await?;
    fetch(pool, id).await
}

/// Check-in fields, bed replacement and (once checked out) check-out fields
///
/// Field replacement only; the status never changes here.
pub async fn update_stay(
    pool: &SqlitePool,
    id: i64,
    payload: &BedStayUpdate,
) -> RepoResult<BedAssignment> {
    let mut tx = begin_immediate(pool).await?;
    let current = load(&mut tx, id).await?;
    current.status.apply(BedAction::EditStay)?;
    let form = validate_stay_update(payload, &current)?;

    let stored = current
        .check_in_details
        .as_ref()
        .ok_or_else(|| AppError::validation("Record has no check-in details"))?;

    let (bed_name, room_name, bed_type) = if form.bed_id == stored.bed_id {
        (
            stored.bed_name.clone(),
            stored.room_name.clone(),
            stored.bed_type.clone(),
        )
    } else {
        let bed = bed_at_site(&mut tx, form.bed_id, current.site_id).await?;
        if current.is_active() {
            ensure_bed_free(&mut tx, bed.id, Some(current.id)).await?;
        }
        (bed.name, bed.room_name, bed.bed_type)
    };

    let (check_out_date, check_out_notes) = match &form.check_out {
        Some(check_out) => (Some(check_out.check_out_date), check_out.notes.clone()),
        None => (None, None),
    };

    let result = sqlx::query(
        "UPDATE bed_assignment SET check_in_date = ?, check_in_notes = ?, bed_id = ?, \
         bed_name = ?, room_name = ?, bed_type = ?, check_out_date = ?, check_out_notes = ?, \
         updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(form.check_in_date)
    .bind(form.check_in_notes.as_deref())
    .bind(form.bed_id)
    .bind(&bed_name)
    .bind(room_name.as_deref())
    .bind(bed_type.as_deref())
    .bind(check_out_date)
    .bind(check_out_notes.as_deref())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await
    .map_err(active_conflict)?;
    ensure_updated(&result, &current, BedAction::EditStay)?;

    tx.commit().await?;
    fetch(pool, id).await
}

/// Remove the record whatever its status
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM bed_assignment WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Check out every SCHEDULED CHECKOUT record whose date is on or before
/// `today`, using the scheduled date as the check-out date
pub async fn finalize_scheduled_checkouts(pool: &SqlitePool, today: NaiveDate) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE bed_assignment SET status = ?, check_out_date = scheduled_checkout_date, \
         updated_at = ? \
         WHERE status = ? AND scheduled_checkout_date IS NOT NULL \
           AND scheduled_checkout_date <= ?",
    )
    .bind(BedStatus::CheckedInOut)
    .bind(shared::util::now_millis())
    .bind(BedStatus::ScheduledCheckout)
    .bind(today)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn fetch(pool: &SqlitePool, id: i64) -> RepoResult<BedAssignment> {
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

async fn load(conn: &mut SqliteConnection, id: i64) -> RepoResult<BedAssignment> {
    let row = sqlx::query_as::<_, BedAssignmentRow>(&format!("{SELECT_ASSIGNMENT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(BedAssignment::from).ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> RepoError {
    AppError::new(ErrorCode::BedRequestNotFound)
        .with_detail("id", id)
        .into()
}

fn check_in_date(assignment: &BedAssignment) -> Option<NaiveDate> {
    assignment
        .check_in_details
        .as_ref()
        .map(|details| details.check_in_date)
}

/// A guarded UPDATE that touched nothing lost a race on the status
fn ensure_updated(
    result: &SqliteQueryResult,
    current: &BedAssignment,
    action: BedAction,
) -> RepoResult<()> {
    if result.rows_affected() == 0 {
        return Err(InvalidTransition {
            from: current.status,
            action,
        }
        .into());
    }
    Ok(())
}

async fn ensure_case_free(conn: &mut SqliteConnection, case_id: i64) -> RepoResult<()> {
    let active = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bed_assignment WHERE case_id = ? AND status IN (?, ?)",
    )
    .bind(case_id)
    .bind(BedStatus::ActiveOccupant)
    .bind(BedStatus::ScheduledCheckout)
    .fetch_one(&mut *conn)
    .await?;

    if active > 0 {
        return Err(AppError::new(ErrorCode::CaseHasActiveBed)
            .with_detail("case_id", case_id)
            .into());
    }
    Ok(())
}

/// `except` skips the record being edited
async fn ensure_bed_free(
    conn: &mut SqliteConnection,
    bed_id: i64,
    except: Option<i64>,
) -> RepoResult<()> {
    let occupied = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bed_assignment \
         WHERE bed_id = ?1 AND status IN (?2, ?3) AND (?4 IS NULL OR id != ?4)",
    )
    .bind(bed_id)
    .bind(BedStatus::ActiveOccupant)
    .bind(BedStatus::ScheduledCheckout)
    .bind(except)
    .fetch_one(&mut *conn)
    .await?;

    if occupied > 0 {
        return Err(AppError::new(ErrorCode::BedNotAvailable)
            .with_detail("bed_id", bed_id)
            .into());
    }
    Ok(())
}

async fn bed_at_site(conn: &mut SqliteConnection, bed_id: i64, site_id: i64) -> RepoResult<Bed> {
    let bed = site::find_bed(&mut *conn, bed_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BedNotFound).with_detail("bed_id", bed_id))?;

    if bed.site_id != site_id {
        return Err(AppError::new(ErrorCode::BedNotInSite)
            .with_detail("bed_id", bed_id)
            .with_detail("site_id", site_id)
            .into());
    }
    Ok(bed)
}

async fn ensure_site_in_agency(
    conn: &mut SqliteConnection,
    site_id: i64,
    agency_id: i64,
) -> RepoResult<()> {
    let owner = sqlx::query_scalar::<_, i64>("SELECT agency_id FROM site WHERE id = ?")
        .bind(site_id)
        .fetch_optional(&mut *conn)
        .await?;

    match owner {
        None => Err(AppError::new(ErrorCode::SiteNotFound)
            .with_detail("site_id", site_id)
            .into()),
        Some(owner) if owner != agency_id => Err(AppError::out_of_scope().into()),
        Some(_) => Ok(()),
    }
}

/// Unique index violations on the active-assignment indexes
fn active_conflict(err: sqlx::Error) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(msg) if msg.contains("case_id") => {
            AppError::new(ErrorCode::CaseHasActiveBed).into()
        }
        RepoError::Duplicate(msg) if msg.contains("bed_id") => {
            AppError::new(ErrorCode::BedNotAvailable).into()
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::test_support::{Fixture, date, fixture, seed};

    fn code(err: RepoError) -> ErrorCode {
        match err {
            RepoError::Rejected(e) => e.code,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    async fn request(fx: &Fixture, case: &Case) -> BedAssignment {
        create_request(
            &fx.pool,
            case,
            &RequestForm {
                case_id: case.id,
                site_id: fx.site.id,
                arrival_date: date(2024, 3, 1),
                notes: Some("referred by outreach".into()),
            },
            fx.admin.id,
        )
        .await
        .unwrap()
    }

    fn check_in_form(bed: &Bed, day: u32) -> CheckInForm {
        CheckInForm {
            bed_id: bed.id,
            check_in_date: date(2024, 3, day),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_request_check_in_check_out() {
        let fx = fixture().await;
        let case = fx.case("Ana").await;

        let requested = request(&fx, &case).await;
        assert_eq!(requested.status, BedStatus::Requested);
        assert!(requested.check_in_details.is_none());

        let active = check_in(&fx.pool, requested.id, &check_in_form(&fx.beds[0], 2))
            .await
            .unwrap();
        assert_eq!(active.status, BedStatus::ActiveOccupant);
        let details = active.check_in_details.as_ref().unwrap();
        assert_eq!(details.bed_name, "A1");
        assert_eq!(details.room_name.as_deref(), Some("Room A"));
        assert_eq!(details.check_in_date, date(2024, 3, 2));

        let done = check_out(
            &fx.pool,
            active.id,
            &BedCheckOut {
                check_out_date: Some(date(2024, 3, 9)),
                notes: Some("moved to housing".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(done.status, BedStatus::CheckedInOut);
        assert_eq!(
            done.check_out_details.unwrap().check_out_date,
            date(2024, 3, 9)
        );
        assert!(find_active_for_case(&fx.pool, case.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_check_out_before_check_in_rejected() {
        let fx = fixture().await;
        let case = fx.case("Ana").await;
        let requested = request(&fx, &case).await;
        check_in(&fx.pool, requested.id, &check_in_form(&fx.beds[0], 5))
            .await
            .unwrap();

        let err = check_out(
            &fx.pool,
            requested.id,
            &BedCheckOut {
                check_out_date: Some(date(2024, 3, 4)),
                notes: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::CheckOutBeforeCheckIn);
    }

    #[tokio::test]
    async fn test_case_with_active_bed_cannot_take_another() {
        let fx = fixture().await;
        let case = fx.case("Ana").await;
        let first = request(&fx, &case).await;
        let second = request(&fx, &case).await;

        check_in(&fx.pool, first.id, &check_in_form(&fx.beds[0], 2))
            .await
            .unwrap();

        let err = check_in(&fx.pool, second.id, &check_in_form(&fx.beds[1], 2))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::CaseHasActiveBed);

        let err = assign(
            &fx.pool,
            &case,
            &AssignForm {
                case_id: case.id,
                site_id: fx.site.id,
                bed_id: fx.beds[1].id,
                check_in_date: date(2024, 3, 2),
                notes: None,
            },
            fx.admin.id,
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::CaseHasActiveBed);
    }

    #[tokio::test]
    async fn test_occupied_bed_rejected_for_other_case() {
        let fx = fixture().await;
        let ana = fx.case("Ana").await;
        let ben = fx.case("Ben").await;

        let ana_request = request(&fx, &ana).await;
        check_in(&fx.pool, ana_request.id, &check_in_form(&fx.beds[0], 2))
            .await
            .unwrap();

        let ben_request = request(&fx, &ben).await;
        let err = check_in(&fx.pool, ben_request.id, &check_in_form(&fx.beds[0], 3))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::BedNotAvailable);

        let still_requested = find_by_id(&fx.pool, ben_request.id).await.unwrap().unwrap();
        assert_eq!(still_requested.status, BedStatus::Requested);
    }

    #[tokio::test]
    async fn test_deny_only_from_requested() {
        let fx = fixture().await;
        let case = fx.case("Ana").await;
        let requested = request(&fx, &case).await;

        let reason = DenyForm {
            reason: "No capacity".into(),
        };
        let denied = deny(&fx.pool, requested.id, &reason).await.unwrap();
        assert_eq!(denied.status, BedStatus::Denied);
        assert_eq!(denied.deny_reason.as_deref(), Some("No capacity"));

        let err = deny(&fx.pool, requested.id, &reason).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::InvalidBedTransition);

        let err = check_in(&fx.pool, requested.id, &check_in_form(&fx.beds[0], 2))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::InvalidBedTransition);
    }

    #[tokio::test]
    async fn test_bed_from_other_site_rejected() {
        let fx = fixture().await;
        let other_site = site::create_site(
            &fx.pool,
            fx.agency.id,
            &shared::models::SiteCreate {
                name: "South".into(),
                address: None,
                agency_id: None,
                location_id: None,
            },
        )
        .await
        .unwrap();
        let foreign_bed = site::create_bed(
            &fx.pool,
            other_site.id,
            &shared::models::BedCreate {
                name: "S1".into(),
                room_name: None,
                bed_type: None,
            },
        )
        .await
        .unwrap();

        let case = fx.case("Ana").await;
        let requested = request(&fx, &case).await;
        let err = check_in(&fx.pool, requested.id, &check_in_form(&foreign_bed, 2))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::BedNotInSite);
    }

    #[tokio::test]
    async fn test_finalizer_moves_only_due_schedules() {
        let fx = fixture().await;
        let due_case = fx.case("Ana").await;
        let later_case = fx.case("Ben").await;
        let active_case = fx.case("Cy").await;

        let mut ids = Vec::new();
        for (case, bed, checkout_day) in [
            (&due_case, &fx.beds[0], Some(10)),
            (&later_case, &fx.beds[1], Some(20)),
        ] {
            let assignment = assign(
                &fx.pool,
                case,
                &AssignForm {
                    case_id: case.id,
                    site_id: fx.site.id,
                    bed_id: bed.id,
                    check_in_date: date(2024, 3, 1),
                    notes: None,
                },
                fx.admin.id,
            )
            .await
            .unwrap();
            if let Some(day) = checkout_day {
                schedule_checkout(
                    &fx.pool,
                    assignment.id,
                    &BedScheduleCheckout {
                        scheduled_checkout_date: Some(date(2024, 3, day)),
                    },
                )
                .await
                .unwrap();
            }
            ids.push(assignment.id);
        }
        let waiting = request(&fx, &active_case).await;

        let moved = finalize_scheduled_checkouts(&fx.pool, date(2024, 3, 10))
            .await
            .unwrap();
        assert_eq!(moved, 1);

        let due = find_by_id(&fx.pool, ids[0]).await.unwrap().unwrap();
        assert_eq!(due.status, BedStatus::CheckedInOut);
        assert_eq!(due.check_out_details.unwrap().check_out_date, date(2024, 3, 10));

        let later = find_by_id(&fx.pool, ids[1]).await.unwrap().unwrap();
        assert_eq!(later.status, BedStatus::ScheduledCheckout);

        let waiting = find_by_id(&fx.pool, waiting.id).await.unwrap().unwrap();
        assert_eq!(waiting.status, BedStatus::Requested);
    }

    #[tokio::test]
    async fn test_update_stay_replaces_bed_and_rejects_occupied() {
        let fx = fixture().await;
        let ana = fx.case("Ana").await;
        let ben = fx.case("Ben").await;
        let extra = site::create_bed(
            &fx.pool,
            fx.site.id,
            &shared::models::BedCreate {
                name: "B1".into(),
                room_name: Some("Room B".into()),
                bed_type: Some("Bunk".into()),
            },
        )
        .await
        .unwrap();

        let ana_request = request(&fx, &ana).await;
        check_in(&fx.pool, ana_request.id, &check_in_form(&fx.beds[0], 2))
            .await
            .unwrap();
        let ben_request = request(&fx, &ben).await;
        check_in(&fx.pool, ben_request.id, &check_in_form(&fx.beds[1], 2))
            .await
            .unwrap();

        let moved = update_stay(
            &fx.pool,
            ana_request.id,
            &BedStayUpdate {
                bed_id: Some(extra.id),
                check_in_notes: Some("moved to bunk".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.status, BedStatus::ActiveOccupant);
        let details = moved.check_in_details.unwrap();
        assert_eq!(details.bed_name, "B1");
        assert_eq!(details.bed_type.as_deref(), Some("Bunk"));
        assert_eq!(details.notes.as_deref(), Some("moved to bunk"));

        let err = update_stay(
            &fx.pool,
            ana_request.id,
            &BedStayUpdate {
                bed_id: Some(fx.beds[1].id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::BedNotAvailable);
    }

    #[tokio::test]
    async fn test_update_request_and_delete() {
        let fx = fixture().await;
        let case = fx.case("Ana").await;
        let requested = request(&fx, &case).await;

        let edited = update_request(
            &fx.pool,
            requested.id,
            &BedRequestUpdate {
                arrival_date: Some(date(2024, 3, 7)),
                notes: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.arrival_date, Some(date(2024, 3, 7)));
        assert_eq!(edited.request_notes, None);

        let err = update_request(
            &fx.pool,
            requested.id,
            &BedRequestUpdate {
                site_id: Some(999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::SiteNotFound);

        delete(&fx.pool, requested.id).await.unwrap();
        assert!(find_by_id(&fx.pool, requested.id).await.unwrap().is_none());
        assert_eq!(
            code(delete(&fx.pool, requested.id).await.unwrap_err()),
            ErrorCode::BedRequestNotFound
        );
    }

    #[tokio::test]
    async fn test_list_filters() {
        let fx = fixture().await;
        let ana = fx.case("Ana").await;
        let ben = fx.case("Ben").await;
        let ana_request = request(&fx, &ana).await;
        request(&fx, &ben).await;
        deny(
            &fx.pool,
            ana_request.id,
            &DenyForm {
                reason: "duplicate".into(),
            },
        )
        .await
        .unwrap();

        let all = find_all(&fx.pool, &ListFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let denied = find_all(
            &fx.pool,
            &ListFilter {
                status: Some(BedStatus::Denied),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(denied.len(), 1);
        assert_eq!(denied[0].case_id, ana.id);

        let bens = find_all(
            &fx.pool,
            &ListFilter {
                case_id: Some(ben.id),
                agency_id: Some(fx.agency.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(bens.len(), 1);

        let other_agency = find_all(
            &fx.pool,
            &ListFilter {
                agency_id: Some(fx.agency.id + 100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(other_agency.is_empty());
    }

    /// Write an active row directly, bypassing the transition checks
    async fn insert_active(fx: &Fixture, case_id: i64, bed_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO bed_assignment (case_id, agency_id, site_id, bed_id, status, \
             check_in_date, bed_name, created_by, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, 'raw', ?, 0, 0)",
        )
        .bind(case_id)
        .bind(fx.agency.id)
        .bind(fx.site.id)
        .bind(bed_id)
        .bind(BedStatus::ActiveOccupant)
        .bind(date(2024, 3, 3))
        .bind(fx.admin.id)
        .execute(&fx.pool)
        .await
        .map(|_| ())
    }

    #[tokio::test]
    async fn test_unique_indexes_map_to_conflicts() {
        let fx = fixture().await;
        let ana = fx.case("Ana").await;
        let ben = fx.case("Ben").await;
        let requested = request(&fx, &ana).await;
        check_in(&fx.pool, requested.id, &check_in_form(&fx.beds[0], 2))
            .await
            .unwrap();

        let err = insert_active(&fx, ana.id, fx.beds[1].id).await.unwrap_err();
        assert_eq!(code(active_conflict(err)), ErrorCode::CaseHasActiveBed);

        let err = insert_active(&fx, ben.id, fx.beds[0].id).await.unwrap_err();
        assert_eq!(code(active_conflict(err)), ErrorCode::BedNotAvailable);

        // Closed stays do not hold the index
        check_out(
            &fx.pool,
            requested.id,
            &BedCheckOut {
                check_out_date: Some(date(2024, 3, 9)),
                notes: None,
            },
        )
        .await
        .unwrap();
        insert_active(&fx, ben.id, fx.beds[0].id).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_check_ins_for_one_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let fx = seed(db.pool.clone()).await;
        let case = fx.case("Ana").await;
        let first = request(&fx, &case).await;
        let second = request(&fx, &case).await;

        let a = tokio::spawn({
            let pool = fx.pool.clone();
            let form = check_in_form(&fx.beds[0], 2);
            async move { check_in(&pool, first.id, &form).await }
        });
        let b = tokio::spawn({
            let pool = fx.pool.clone();
            let form = check_in_form(&fx.beds[1], 2);
            async move { check_in(&pool, second.id, &form).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.into_iter().find_map(Result::err).unwrap();
        assert_eq!(code(err), ErrorCode::CaseHasActiveBed);

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bed_assignment WHERE case_id = ? AND status = ?",
        )
        .bind(case.id)
        .bind(BedStatus::ActiveOccupant)
        .fetch_one(&fx.pool)
        .await
        .unwrap();
        assert_eq!(active, 1);
    }
}
