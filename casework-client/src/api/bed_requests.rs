//! Bed request wrappers

use shared::access::Capability;
use shared::bed::BedAction;
use shared::bed::validation::{
    validate_bed_assign, validate_bed_request, validate_check_in, validate_check_out,
    validate_deny, validate_request_update, validate_schedule_checkout, validate_stay_update,
};
use shared::models::{
    BedAssignCreate, BedAssignment, BedCheckIn, BedCheckOut, BedDeny, BedRequestCreate,
    BedRequestQuery, BedRequestUpdate, BedScheduleCheckout, BedStayUpdate, CurrentBedAssignment,
};

use super::{ensure_transition, query_string};
use crate::{CaseworkClient, ClientResult, HttpClient};

fn check_in_date(record: &BedAssignment) -> Option<chrono::NaiveDate> {
    record.check_in_details.as_ref().map(|d| d.check_in_date)
}

impl<H: HttpClient> CaseworkClient<H> {
    /// GET /api/bed-requests
    pub async fn fetch_all_bed_requests(
        &self,
        query: &BedRequestQuery,
    ) -> ClientResult<Vec<BedAssignment>> {
        self.session().require(Capability::ViewBedRequests)?;
        let qs = query_string(&[
            ("agency_id", query.agency_id.map(|v| v.to_string())),
            ("case_id", query.case_id.map(|v| v.to_string())),
            ("site_id", query.site_id.map(|v| v.to_string())),
            ("status", query.status.map(|s| s.as_str().to_string())),
        ]);
        self.http.get(&format!("api/bed-requests{qs}")).await
    }

    /// GET /api/bed-requests/{id}
    pub async fn fetch_bed_request(&self, id: i64) -> ClientResult<BedAssignment> {
        self.session().require(Capability::ViewBedRequests)?;
        self.http.get(&format!("api/bed-requests/{id}")).await
    }

    /// POST /api/bed-requests
    pub async fn create_bed_request(
        &self,
        payload: &BedRequestCreate,
    ) -> ClientResult<BedAssignment> {
        self.session().require(Capability::CreateBedRequest)?;
        validate_bed_request(payload)?;
        self.http.post("api/bed-requests", payload).await
    }

    /// POST /api/bed-requests/assign
    ///
    /// Blocked without a request when the case already holds a bed.
    /// `current` is the caller's copy of the case's current bed, if any.
    pub async fn assign_bed(
        &self,
        payload: &BedAssignCreate,
        current: Option<&CurrentBedAssignment>,
    ) -> ClientResult<BedAssignment> {
        self.session().require(Capability::AssignBed)?;
        let form = validate_bed_assign(payload)?;
        self.guard_no_active_bed(form.case_id, current).await?;
        self.http.post("api/bed-requests/assign", payload).await
    }

    /// POST /api/bed-requests/{id}/check-in
    ///
    /// Blocked without a request when the case already holds a bed.
    pub async fn check_in_bed(
        &self,
        record: &BedAssignment,
        payload: &BedCheckIn,
        current: Option<&CurrentBedAssignment>,
    ) -> ClientResult<BedAssignment> {
        let session = self.session();
        session.require(Capability::CheckInBed)?;
        session.ensure(
            session.capabilities().can_edit_bed_request(record),
            "check in this bed request",
        )?;
        ensure_transition(record, BedAction::CheckIn)?;
        validate_check_in(payload)?;
        self.guard_no_active_bed(record.case_id, current).await?;
        self.http
            .post(&format!("api/bed-requests/{}/check-in", record.id), payload)
            .await
    }

    /// PUT /api/bed-requests/{id}/check-in
    pub async fn edit_bed_check_in(
        &self,
        record: &BedAssignment,
        payload: &BedStayUpdate,
    ) -> ClientResult<BedAssignment> {
        let session = self.session();
        session.ensure(
            session.capabilities().can_edit_bed_request(record),
            "edit this stay",
        )?;
        ensure_transition(record, BedAction::EditStay)?;
        validate_stay_update(payload, record)?;
        self.http
            .put(&format!("api/bed-requests/{}/check-in", record.id), payload)
            .await
    }

    /// PUT /api/bed-requests/{id}
    pub async fn update_bed_request(
        &self,
        record: &BedAssignment,
        payload: &BedRequestUpdate,
    ) -> ClientResult<BedAssignment> {
        let session = self.session();
        session.ensure(
            session.capabilities().can_edit_bed_request(record),
            "edit this bed request",
        )?;
        ensure_transition(record, BedAction::EditRequest)?;
        validate_request_update(payload, record)?;
        self.http
            .put(&format!("api/bed-requests/{}", record.id), payload)
            .await
    }

    /// DELETE /api/bed-requests/{id}
    pub async fn delete_bed_request(&self, record: &BedAssignment) -> ClientResult<bool> {
        let session = self.session();
        session.ensure(
            session.capabilities().can_delete_bed_request(record),
            "delete this bed request",
        )?;
        self.http
            .delete(&format!("api/bed-requests/{}", record.id))
            .await
    }

    /// POST /api/bed-requests/{id}/schedule-checkout
    pub async fn schedule_bed_checkout(
        &self,
        record: &BedAssignment,
        payload: &BedScheduleCheckout,
    ) -> ClientResult<BedAssignment> {
        self.session().require(Capability::CheckOutBed)?;
        ensure_transition(record, BedAction::ScheduleCheckout)?;
        validate_schedule_checkout(payload, check_in_date(record))?;
        self.http
            .post(
                &format!("api/bed-requests/{}/schedule-checkout", record.id),
                payload,
            )
            .await
    }

    /// POST /api/bed-requests/{id}/check-out
    pub async fn bed_check_out(
        &self,
        record: &BedAssignment,
        payload: &BedCheckOut,
    ) -> ClientResult<BedAssignment> {
        self.session().require(Capability::CheckOutBed)?;
        ensure_transition(record, BedAction::CheckOut)?;
        validate_check_out(payload, check_in_date(record))?;
        self.http
            .post(&format!("api/bed-requests/{}/check-out", record.id), payload)
            .await
    }

    /// POST /api/bed-requests/{id}/deny
    pub async fn deny_bed_request(
        &self,
        record: &BedAssignment,
        payload: &BedDeny,
    ) -> ClientResult<BedAssignment> {
        self.session().require(Capability::DenyBedRequest)?;
        ensure_transition(record, BedAction::Deny)?;
        validate_deny(payload)?;
        self.http
            .post(&format!("api/bed-requests/{}/deny", record.id), payload)
            .await
    }
}
