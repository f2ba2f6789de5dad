//! Case-side records that only matter here as permission targets

use serde::{Deserialize, Serialize};

use crate::access::Scoped;

/// Comment on a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub case_id: i64,
    pub agency_id: i64,
    pub location_id: Option<i64>,
    pub created_by: i64,
    pub body: String,
}

/// Assessment; global assessments are shared by every agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub agency_id: i64,
    pub location_id: Option<i64>,
    pub created_by: i64,
    pub name: String,
    pub is_global: bool,
}

/// Rental subsidy paid for a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalSubsidyRecord {
    pub id: i64,
    pub case_id: i64,
    pub agency_id: i64,
    pub location_id: Option<i64>,
    pub created_by: i64,
    pub amount_cents: i64,
}

macro_rules! impl_scoped {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Scoped for $ty {
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
        )+
    };
}

impl_scoped!(Comment, Assessment, RentalSubsidyRecord);
