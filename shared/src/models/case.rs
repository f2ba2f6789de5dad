//! Case Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BedAssignment;
use crate::access::Scoped;

/// Case (client) record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Case {
    pub id: i64,
    pub agency_id: i64,
    pub location_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_by: i64,
    pub created_at: i64,
}

impl Scoped for Case {
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

/// Create case payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseCreate {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Owning agency; only network administrators may name another one
    pub agency_id: Option<i64>,
    /// Defaults to the acting user's active location
    pub location_id: Option<i64>,
}

/// Current bed of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentBedAssignment {
    pub case_id: i64,
    pub has_allocated_bed: bool,
    pub current_bed_assignment: Option<BedAssignment>,
}

impl CurrentBedAssignment {
    pub fn new(case_id: i64, assignment: Option<BedAssignment>) -> Self {
        Self {
            case_id,
            has_allocated_bed: assignment.is_some(),
            current_bed_assignment: assignment,
        }
    }
}
