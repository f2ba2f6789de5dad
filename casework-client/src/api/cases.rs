//! Case wrappers

use shared::access::Capability;
use shared::models::{Case, CaseCreate, CurrentBedAssignment};

use crate::{CaseworkClient, ClientResult, HttpClient};

impl<H: HttpClient> CaseworkClient<H> {
    /// POST /api/cases
    pub async fn create_case(&self, payload: &CaseCreate) -> ClientResult<Case> {
        self.session().require(Capability::CreateCases)?;
        self.http.post("api/cases", payload).await
    }

    /// GET /api/cases/{id}
    pub async fn fetch_case(&self, id: i64) -> ClientResult<Case> {
        self.session().require(Capability::ViewCases)?;
        self.http.get(&format!("api/cases/{id}")).await
    }

    /// GET /api/cases/{id}/current-bed
    pub async fn fetch_current_bed_assignment(
        &self,
        case_id: i64,
    ) -> ClientResult<CurrentBedAssignment> {
        self.session().require(Capability::ViewBedRequests)?;
        self.http
            .get(&format!("api/cases/{case_id}/current-bed"))
            .await
    }
}
