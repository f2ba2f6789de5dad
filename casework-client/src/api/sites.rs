//! Site, bed and agency summary wrappers

use shared::access::Capability;
use shared::models::{Bed, BedCreate, Site, SiteBedSummary, SiteCreate};

use crate::{CaseworkClient, ClientResult, HttpClient};

impl<H: HttpClient> CaseworkClient<H> {
    /// POST /api/sites
    pub async fn create_site(&self, payload: &SiteCreate) -> ClientResult<Site> {
        self.session().require(Capability::ManageBeds)?;
        self.http.post("api/sites", payload).await
    }

    /// POST /api/sites/{id}/beds
    pub async fn create_bed(&self, site_id: i64, payload: &BedCreate) -> ClientResult<Bed> {
        self.session().require(Capability::ManageBeds)?;
        self.http
            .post(&format!("api/sites/{site_id}/beds"), payload)
            .await
    }

    /// GET /api/sites/{id}/available-beds
    pub async fn fetch_available_beds_by_site(&self, site_id: i64) -> ClientResult<Vec<Bed>> {
        self.session().require(Capability::ViewBedRequests)?;
        self.http
            .get(&format!("api/sites/{site_id}/available-beds"))
            .await
    }

    /// GET /api/agencies/{id}/bed-summary
    pub async fn fetch_company_site_bed_summary(
        &self,
        agency_id: i64,
    ) -> ClientResult<Vec<SiteBedSummary>> {
        self.session().require(Capability::ViewBedRequests)?;
        self.http
            .get(&format!("api/agencies/{agency_id}/bed-summary"))
            .await
    }
}
