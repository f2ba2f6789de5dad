//! Bed workflow form validation
//!
//! Each `validate_*` function checks one form and returns either the
//! normalized values or an [`AppError`] whose `details` map every failing
//! field to its message. The client runs the same checks before submitting,
//! the server runs them again on receipt.

use chrono::NaiveDate;

use crate::error::{AppError, ErrorCode};
use crate::models::{
    BedAssignCreate, BedAssignment, BedCheckIn, BedCheckOut, BedDeny, BedRequestCreate,
    BedRequestUpdate, BedScheduleCheckout, BedStayUpdate,
};

/// Notes on requests, check-ins and check-outs
pub const MAX_NOTES_LEN: usize = 500;

/// Deny reason
pub const MAX_REASON_LEN: usize = 500;

pub const CHECK_OUT_BEFORE_CHECK_IN: &str = "Check-out date cannot be before check-in date";
pub const SCHEDULED_BEFORE_CHECK_IN: &str =
    "Scheduled checkout date cannot be before check-in date";

/// Field-level errors collected in form order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(&'static str, ErrorCode, String)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.add_with_code(field, ErrorCode::ValidationFailed, message);
    }

    pub fn add_with_code(&mut self, field: &'static str, code: ErrorCode, message: impl Into<String>) {
        self.errors.push((field, code, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _, _)| *f == field)
            .map(|(_, _, message)| message.as_str())
    }

    /// `Ok(value)` when nothing failed
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        let Some((_, code, message)) = self.errors.first() else {
            return Ok(value);
        };
        let mut err = AppError::with_message(*code, message.clone());
        for (field, _, message) in &self.errors {
            err = err.with_detail(*field, message.clone());
        }
        Err(err)
    }

    /// Error of a form already known to have failed
    fn into_error(self) -> AppError {
        match self.finish(()) {
            Err(err) => err,
            Ok(()) => AppError::new(ErrorCode::ValidationFailed),
        }
    }

    fn require<T: Copy>(&mut self, value: Option<T>, field: &'static str, label: &str) -> Option<T> {
        if value.is_none() {
            self.add(field, format!("{label} is required"));
        }
        value
    }

    fn optional_text(
        &mut self,
        value: &Option<String>,
        field: &'static str,
        label: &str,
        max_len: usize,
    ) -> Option<String> {
        let text = normalize(value);
        if let Some(t) = &text
            && t.chars().count() > max_len
        {
            self.add(field, format!("{label} must be at most {max_len} characters"));
        }
        text
    }

    fn date_order(
        &mut self,
        check_in: Option<NaiveDate>,
        later: Option<NaiveDate>,
        field: &'static str,
        message: &str,
    ) {
        if let (Some(check_in), Some(later)) = (check_in, later)
            && later < check_in
        {
            self.add_with_code(field, ErrorCode::CheckOutBeforeCheckIn, message);
        }
    }
}

/// Trim, and treat blank text as absent
fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ── Validated forms ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestForm {
    pub case_id: i64,
    pub site_id: i64,
    pub arrival_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignForm {
    pub case_id: i64,
    pub site_id: i64,
    pub bed_id: i64,
    pub check_in_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInForm {
    pub bed_id: i64,
    pub check_in_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutForm {
    pub check_out_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCheckoutForm {
    pub scheduled_checkout_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyForm {
    pub reason: String,
}

/// Request fields after merging an edit over the stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEditForm {
    pub site_id: i64,
    pub arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Stay fields after merging an edit over the stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayForm {
    pub check_in_date: NaiveDate,
    pub check_in_notes: Option<String>,
    pub bed_id: i64,
    pub check_out: Option<CheckOutForm>,
}

// ── Validators ──────────────────────────────────────────────────────

pub fn validate_bed_request(form: &BedRequestCreate) -> Result<RequestForm, AppError> {
    let mut errors = FormErrors::new();
    let case_id = errors.require(form.case_id, "case_id", "Case");
    let site_id = errors.require(form.site_id, "site_id", "Site");
    let arrival_date = errors.require(form.arrival_date, "arrival_date", "Arrival date");
    let notes = errors.optional_text(&form.notes, "notes", "Notes", MAX_NOTES_LEN);

    match (case_id, site_id, arrival_date) {
        (Some(case_id), Some(site_id), Some(arrival_date)) => errors.finish(RequestForm {
            case_id,
            site_id,
            arrival_date,
            notes,
        }),
        _ => Err(errors.into_error()),
    }
}

pub fn validate_bed_assign(form: &BedAssignCreate) -> Result<AssignForm, AppError> {
    let mut errors = FormErrors::new();
    let case_id = errors.require(form.case_id, "case_id", "Case");
    let site_id = errors.require(form.site_id, "site_id", "Site");
    let bed_id = errors.require(form.bed_id, "bed_id", "Bed");
    let check_in_date = errors.require(form.check_in_date, "check_in_date", "Check-in date");
    let notes = errors.optional_text(&form.notes, "notes", "Notes", MAX_NOTES_LEN);

    match (case_id, site_id, bed_id, check_in_date) {
        (Some(case_id), Some(site_id), Some(bed_id), Some(check_in_date)) => {
            errors.finish(AssignForm {
                case_id,
                site_id,
                bed_id,
                check_in_date,
                notes,
            })
        }
        _ => Err(errors.into_error()),
    }
}

pub fn validate_check_in(form: &BedCheckIn) -> Result<CheckInForm, AppError> {
    let mut errors = FormErrors::new();
    let bed_id = errors.require(form.bed_id, "bed_id", "Bed");
    let check_in_date = errors.require(form.check_in_date, "check_in_date", "Check-in date");
    let notes = errors.optional_text(&form.notes, "notes", "Notes", MAX_NOTES_LEN);

    match (bed_id, check_in_date) {
        (Some(bed_id), Some(check_in_date)) => errors.finish(CheckInForm {
            bed_id,
            check_in_date,
            notes,
        }),
        _ => Err(errors.into_error()),
    }
}

/// `check_in_date` comes from the stored record
pub fn validate_check_out(
    form: &BedCheckOut,
    check_in_date: Option<NaiveDate>,
) -> Result<CheckOutForm, AppError> {
    let mut errors = FormErrors::new();
    let check_out_date = errors.require(form.check_out_date, "check_out_date", "Check-out date");
    errors.date_order(
        check_in_date,
        check_out_date,
        "check_out_date",
        CHECK_OUT_BEFORE_CHECK_IN,
    );
    let notes = errors.optional_text(&form.notes, "notes", "Notes", MAX_NOTES_LEN);

    match check_out_date {
        Some(check_out_date) => errors.finish(CheckOutForm {
            check_out_date,
            notes,
        }),
        None => Err(errors.into_error()),
    }
}

pub fn validate_schedule_checkout(
    form: &BedScheduleCheckout,
    check_in_date: Option<NaiveDate>,
) -> Result<ScheduleCheckoutForm, AppError> {
    let mut errors = FormErrors::new();
    let date = errors.require(
        form.scheduled_checkout_date,
        "scheduled_checkout_date",
        "Scheduled checkout date",
    );
    errors.date_order(
        check_in_date,
        date,
        "scheduled_checkout_date",
        SCHEDULED_BEFORE_CHECK_IN,
    );

    match date {
        Some(scheduled_checkout_date) => errors.finish(ScheduleCheckoutForm {
            scheduled_checkout_date,
        }),
        None => Err(errors.into_error()),
    }
}

pub fn validate_deny(form: &BedDeny) -> Result<DenyForm, AppError> {
    let mut errors = FormErrors::new();
    let reason = errors.optional_text(&form.reason, "reason", "Reason", MAX_REASON_LEN);
    match reason {
        Some(reason) => errors.finish(DenyForm { reason }),
        None => {
            errors.add("reason", "Reason is required");
            Err(errors.into_error())
        }
    }
}

/// Merge an edit of a not-yet-admitted request over `current`
pub fn validate_request_update(
    form: &BedRequestUpdate,
    current: &BedAssignment,
) -> Result<RequestEditForm, AppError> {
    let mut errors = FormErrors::new();
    let notes = match &form.notes {
        Some(_) => errors.optional_text(&form.notes, "notes", "Notes", MAX_NOTES_LEN),
        None => current.request_notes.clone(),
    };

    errors.finish(RequestEditForm {
        site_id: form.site_id.unwrap_or(current.site_id),
        arrival_date: form.arrival_date.or(current.arrival_date),
        notes,
    })
}

/// Merge an edit of a stay over `current`
///
/// Check-out fields are only accepted on checked-out records, and the
/// merged check-out date must not precede the merged check-in date.
pub fn validate_stay_update(
    form: &BedStayUpdate,
    current: &BedAssignment,
) -> Result<StayForm, AppError> {
    let mut errors = FormErrors::new();

    let Some(check_in) = &current.check_in_details else {
        errors.add("check_in_date", "Record has no check-in details");
        return Err(errors.into_error());
    };

    let check_in_date = form.check_in_date.unwrap_or(check_in.check_in_date);
    let check_in_notes = match &form.check_in_notes {
        Some(_) => errors.optional_text(&form.check_in_notes, "check_in_notes", "Notes", MAX_NOTES_LEN),
        None => check_in.notes.clone(),
    };

    let editing_check_out = form.check_out_date.is_some() || form.check_out_notes.is_some();
    let check_out = match &current.check_out_details {
        Some(stored) => {
            let check_out_date = form.check_out_date.unwrap_or(stored.check_out_date);
            errors.date_order(
                Some(check_in_date),
                Some(check_out_date),
                "check_out_date",
                CHECK_OUT_BEFORE_CHECK_IN,
            );
            let notes = match &form.check_out_notes {
                Some(_) => errors.optional_text(
                    &form.check_out_notes,
                    "check_out_notes",
                    "Notes",
                    MAX_NOTES_LEN,
                ),
                None => stored.notes.clone(),
            };
            Some(CheckOutForm {
                check_out_date,
                notes,
            })
        }
        None if editing_check_out => {
            errors.add("check_out_date", "Record has not been checked out");
            None
        }
        None => None,
    };

    if let Some(scheduled) = current.scheduled_checkout_date
        && check_out.is_none()
    {
        errors.date_order(
            Some(check_in_date),
            Some(scheduled),
            "check_in_date",
            SCHEDULED_BEFORE_CHECK_IN,
        );
    }

    errors.finish(StayForm {
        check_in_date,
        check_in_notes,
        bed_id: form.bed_id.unwrap_or(check_in.bed_id),
        check_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::BedStatus;
    use crate::models::{CheckInDetails, CheckOutDetails};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn checked_in(status: BedStatus) -> BedAssignment {
        BedAssignment {
            id: 1,
            case_id: 2,
            agency_id: 3,
            location_id: None,
            site_id: 4,
            bed_id: Some(5),
            status,
            arrival_date: Some(date(2024, 1, 9)),
            request_notes: Some("walk-in".into()),
            deny_reason: None,
            check_in_details: Some(CheckInDetails {
                check_in_date: date(2024, 1, 10),
                notes: Some("arrived".into()),
                bed_id: 5,
                bed_name: "A1".into(),
                room_name: Some("Room A".into()),
                bed_type: Some("Single".into()),
            }),
            check_out_details: None,
            scheduled_checkout_date: None,
            created_by: 6,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_check_out_before_check_in_is_invalid() {
        let form = BedCheckOut {
            check_out_date: Some(date(2024, 1, 9)),
            notes: None,
        };
        let err = validate_check_out(&form, Some(date(2024, 1, 10))).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckOutBeforeCheckIn);
        assert_eq!(err.message, "Check-out date cannot be before check-in date");
        assert_eq!(
            err.details.unwrap()["check_out_date"],
            "Check-out date cannot be before check-in date"
        );
    }

    #[test]
    fn test_check_out_on_or_after_check_in_is_valid() {
        for day in [10, 11, 28] {
            let form = BedCheckOut {
                check_out_date: Some(date(2024, 1, day)),
                notes: Some("  moved out  ".into()),
            };
            let valid = validate_check_out(&form, Some(date(2024, 1, 10))).unwrap();
            assert_eq!(valid.check_out_date, date(2024, 1, day));
            assert_eq!(valid.notes.as_deref(), Some("moved out"));
        }
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = validate_bed_assign(&BedAssignCreate::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Case is required");
        let details = err.details.unwrap();
        for field in ["case_id", "site_id", "bed_id", "check_in_date"] {
            assert!(details.contains_key(field), "{field}");
        }
    }

    #[test]
    fn test_bed_request_normalizes_blank_notes() {
        let form = BedRequestCreate {
            case_id: Some(1),
            site_id: Some(2),
            arrival_date: Some(date(2024, 2, 1)),
            notes: Some("   ".into()),
        };
        let valid = validate_bed_request(&form).unwrap();
        assert_eq!(valid.notes, None);
    }

    #[test]
    fn test_notes_length_limit() {
        let form = BedCheckIn {
            bed_id: Some(1),
            check_in_date: Some(date(2024, 2, 1)),
            notes: Some("x".repeat(MAX_NOTES_LEN + 1)),
        };
        let err = validate_check_in(&form).unwrap_err();
        assert_eq!(err.details.unwrap()["notes"], "Notes must be at most 500 characters");
    }

    #[test]
    fn test_deny_requires_reason() {
        let err = validate_deny(&BedDeny {
            reason: Some(" ".into()),
        })
        .unwrap_err();
        assert_eq!(err.message, "Reason is required");

        let ok = validate_deny(&BedDeny {
            reason: Some("No capacity".into()),
        })
        .unwrap();
        assert_eq!(ok.reason, "No capacity");
    }

    #[test]
    fn test_schedule_checkout_not_before_check_in() {
        let form = BedScheduleCheckout {
            scheduled_checkout_date: Some(date(2024, 1, 5)),
        };
        let err = validate_schedule_checkout(&form, Some(date(2024, 1, 10))).unwrap_err();
        assert_eq!(err.message, SCHEDULED_BEFORE_CHECK_IN);

        let form = BedScheduleCheckout {
            scheduled_checkout_date: Some(date(2024, 1, 10)),
        };
        assert!(validate_schedule_checkout(&form, Some(date(2024, 1, 10))).is_ok());
    }

    #[test]
    fn test_request_update_keeps_stored_values() {
        let mut current = checked_in(BedStatus::Requested);
        current.check_in_details = None;
        let edit = validate_request_update(
            &BedRequestUpdate {
                arrival_date: Some(date(2024, 1, 12)),
                ..Default::default()
            },
            &current,
        )
        .unwrap();
        assert_eq!(edit.site_id, 4);
        assert_eq!(edit.arrival_date, Some(date(2024, 1, 12)));
        assert_eq!(edit.notes.as_deref(), Some("walk-in"));
    }

    #[test]
    fn test_stay_update_merges_and_checks_order() {
        let mut current = checked_in(BedStatus::CheckedInOut);
        current.check_out_details = Some(CheckOutDetails {
            check_out_date: date(2024, 1, 15),
            notes: None,
        });

        let stay = validate_stay_update(
            &BedStayUpdate {
                check_in_date: Some(date(2024, 1, 12)),
                ..Default::default()
            },
            &current,
        )
        .unwrap();
        assert_eq!(stay.check_in_date, date(2024, 1, 12));
        assert_eq!(stay.bed_id, 5);
        assert_eq!(stay.check_out.unwrap().check_out_date, date(2024, 1, 15));

        let err = validate_stay_update(
            &BedStayUpdate {
                check_in_date: Some(date(2024, 1, 16)),
                ..Default::default()
            },
            &current,
        )
        .unwrap_err();
        assert_eq!(err.message, CHECK_OUT_BEFORE_CHECK_IN);
    }

    #[test]
    fn test_stay_update_rejects_check_out_on_active_stay() {
        let current = checked_in(BedStatus::ActiveOccupant);
        let err = validate_stay_update(
            &BedStayUpdate {
                check_out_date: Some(date(2024, 1, 20)),
                ..Default::default()
            },
            &current,
        )
        .unwrap_err();
        assert_eq!(err.details.unwrap()["check_out_date"], "Record has not been checked out");
    }

    #[test]
    fn test_form_errors_get() {
        let mut errors = FormErrors::new();
        assert!(errors.is_empty());
        errors.add("bed_id", "Bed is required");
        assert_eq!(errors.get("bed_id"), Some("Bed is required"));
        assert_eq!(errors.get("notes"), None);
    }
}
