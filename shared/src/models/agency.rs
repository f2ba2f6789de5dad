//! Agency, Site and Bed Models
//!
//! An agency may have sub-agencies (locations) through `parent_id`.
//! Sites belong to an agency and hold beds.

use serde::{Deserialize, Serialize};

use crate::access::Scoped;

/// Agency or location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Agency {
    pub id: i64,
    pub name: String,
    /// Parent agency when this row is a location
    pub parent_id: Option<i64>,
    pub created_at: i64,
}

/// Housing site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Site {
    pub id: i64,
    pub agency_id: i64,
    pub location_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub created_at: i64,
}

/// Create site payload
impl Scoped for Site {
    fn agency_id(&self) -> i64 {
        self.agency_id
    }

    fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    fn owner_id(&self) -> Option<i64> {
        None
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteCreate {
    pub name: String,
    pub address: Option<String>,
    /// Owning agency; only network administrators may name another one
    pub agency_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Bed inside a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Bed {
    pub id: i64,
    pub site_id: i64,
    pub name: String,
    pub room_name: Option<String>,
    pub bed_type: Option<String>,
    pub created_at: i64,
}

/// Create bed payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedCreate {
    pub name: String,
    pub room_name: Option<String>,
    pub bed_type: Option<String>,
}

/// Occupancy summary of one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SiteBedSummary {
    pub site_id: i64,
    pub site_name: String,
    pub total_beds: i64,
    pub occupied_beds: i64,
    pub available_beds: i64,
    pub pending_requests: i64,
}
