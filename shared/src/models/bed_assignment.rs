//! Bed Assignment Model
//!
//! One row per claim of a case on a bed, from request to check-out.
//! Incoming payloads keep required inputs optional so the form validators
//! in [`crate::bed::validation`] can report every missing field at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::access::Scoped;
use crate::bed::BedStatus;

/// Snapshot of the bed taken when the case checked in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInDetails {
    pub check_in_date: NaiveDate,
    pub notes: Option<String>,
    pub bed_id: i64,
    pub bed_name: String,
    pub room_name: Option<String>,
    pub bed_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutDetails {
    pub check_out_date: NaiveDate,
    pub notes: Option<String>,
}

/// Bed request / assignment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedAssignment {
    pub id: i64,
    pub case_id: i64,
    pub agency_id: i64,
    pub location_id: Option<i64>,
    pub site_id: i64,
    pub bed_id: Option<i64>,
    pub status: BedStatus,
    pub arrival_date: Option<NaiveDate>,
    pub request_notes: Option<String>,
    pub deny_reason: Option<String>,
    pub check_in_details: Option<CheckInDetails>,
    pub check_out_details: Option<CheckOutDetails>,
    pub scheduled_checkout_date: Option<NaiveDate>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl BedAssignment {
    /// Case currently holds the bed
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl Scoped for BedAssignment {
    fn agency_id(&self) -> i64 {
        self.agency_id
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn owner_id(&self) -> Option<i64> {
        Some(self.created_by)
    }
}

/// Create bed request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedRequestCreate {
    pub case_id: Option<i64>,
    pub site_id: Option<i64>,
    pub arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Direct assignment payload (skips the request step)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedAssignCreate {
    pub case_id: Option<i64>,
    pub site_id: Option<i64>,
    pub bed_id: Option<i64>,
    pub check_in_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Check-in payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedCheckIn {
    pub bed_id: Option<i64>,
    pub check_in_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Check-out payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedCheckOut {
    pub check_out_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Schedule checkout payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedScheduleCheckout {
    pub scheduled_checkout_date: Option<NaiveDate>,
}

/// Deny payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedDeny {
    pub reason: Option<String>,
}

/// Edit of a request that has not been checked in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedRequestUpdate {
    pub site_id: Option<i64>,
    pub arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Edit of a stay; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedStayUpdate {
    pub check_in_date: Option<NaiveDate>,
    pub check_in_notes: Option<String>,
    /// Replacement bed at the same site
    pub bed_id: Option<i64>,
    /// Only valid on checked-out records
    pub check_out_date: Option<NaiveDate>,
    pub check_out_notes: Option<String>,
}

/// Filter for bed request listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedRequestQuery {
    pub agency_id: Option<i64>,
    pub case_id: Option<i64>,
    pub site_id: Option<i64>,
    pub status: Option<BedStatus>,
}
