//! Capability bundle

use serde::{Deserialize, Serialize};

use super::{Principal, Role, Scoped};
use crate::bed::BedStatus;
use crate::models::{Assessment, BedAssignment, Comment, RentalSubsidyRecord, User};

/// Role-level capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilityFlags {
    // Users
    pub can_view_users: bool,
    pub can_create_users: bool,
    pub can_update_users: bool,
    pub can_update_roles: bool,
    pub can_update_user_status: bool,
    pub can_approve_agent_requests: bool,

    // Agencies and inventory
    pub can_manage_agencies: bool,
    pub can_manage_locations: bool,
    pub can_manage_categories: bool,
    pub can_manage_services: bool,
    pub can_manage_beds: bool,

    // Cases
    pub can_view_cases: bool,
    pub can_create_cases: bool,

    // Bed workflow
    pub can_view_bed_requests: bool,
    pub can_create_bed_request: bool,
    pub can_assign_bed: bool,
    pub can_check_in_bed: bool,
    pub can_check_out_bed: bool,
    pub can_deny_bed_request: bool,

    // Assessments, outcomes, subsidies
    pub can_create_assessments: bool,
    pub can_manage_global_assessments: bool,
    pub can_delete_outcomes: bool,
    pub can_manage_rental_subsidies: bool,
}

impl CapabilityFlags {
    /// Grants nothing
    pub const NONE: CapabilityFlags = CapabilityFlags {
        can_view_users: false,
        can_create_users: false,
        can_update_users: false,
        can_update_roles: false,
        can_update_user_status: false,
        can_approve_agent_requests: false,
        can_manage_agencies: false,
        can_manage_locations: false,
        can_manage_categories: false,
        can_manage_services: false,
        can_manage_beds: false,
        can_view_cases: false,
        can_create_cases: false,
        can_view_bed_requests: false,
        can_create_bed_request: false,
        can_assign_bed: false,
        can_check_in_bed: false,
        can_check_out_bed: false,
        can_deny_bed_request: false,
        can_create_assessments: false,
        can_manage_global_assessments: false,
        can_delete_outcomes: false,
        can_manage_rental_subsidies: false,
    };

    pub const fn for_role(role: Role) -> CapabilityFlags {
        match role {
            Role::NetworkAdministrator => CapabilityFlags {
                can_view_users: true,
                can_create_users: true,
                can_update_users: true,
                can_update_roles: true,
                can_update_user_status: true,
                can_approve_agent_requests: true,
                can_manage_agencies: true,
                can_manage_locations: true,
                can_manage_categories: true,
                can_manage_services: true,
                can_manage_beds: true,
                can_view_cases: true,
                can_create_cases: true,
                can_view_bed_requests: true,
                can_create_bed_request: true,
                can_assign_bed: true,
                can_check_in_bed: true,
                can_check_out_bed: true,
                can_deny_bed_request: true,
                can_create_assessments: true,
                can_manage_global_assessments: true,
                can_delete_outcomes: true,
                can_manage_rental_subsidies: true,
            },
            Role::AgencyAdministrator => CapabilityFlags {
                can_view_users: true,
                can_create_users: true,
                can_update_users: true,
                can_update_roles: true,
                can_update_user_status: true,
                can_approve_agent_requests: true,
                can_manage_agencies: false,
                can_manage_locations: true,
                can_manage_categories: true,
                can_manage_services: true,
                can_manage_beds: true,
                can_view_cases: true,
                can_create_cases: true,
                can_view_bed_requests: true,
                can_create_bed_request: true,
                can_assign_bed: true,
                can_check_in_bed: true,
                can_check_out_bed: true,
                can_deny_bed_request: true,
                can_create_assessments: true,
                can_manage_global_assessments: false,
                can_delete_outcomes: false,
                can_manage_rental_subsidies: true,
            },
            Role::Agent => CapabilityFlags {
                can_view_cases: true,
                can_create_cases: true,
                can_view_bed_requests: true,
                can_create_bed_request: true,
                can_create_assessments: true,
                can_manage_rental_subsidies: true,
                ..CapabilityFlags::NONE
            },
        }
    }
}

/// Name of a single flag, used by route guards and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewUsers,
    CreateUsers,
    UpdateUsers,
    UpdateRoles,
    UpdateUserStatus,
    ApproveAgentRequests,
    ManageAgencies,
    ManageLocations,
    ManageCategories,
    ManageServices,
    ManageBeds,
    ViewCases,
    CreateCases,
    ViewBedRequests,
    CreateBedRequest,
    AssignBed,
    CheckInBed,
    CheckOutBed,
    DenyBedRequest,
    CreateAssessments,
    ManageGlobalAssessments,
    DeleteOutcomes,
    ManageRentalSubsidies,
}

impl Capability {
    pub const ALL: [Capability; 23] = [
        Capability::ViewUsers,
        Capability::CreateUsers,
        Capability::UpdateUsers,
        Capability::UpdateRoles,
        Capability::UpdateUserStatus,
        Capability::ApproveAgentRequests,
        Capability::ManageAgencies,
        Capability::ManageLocations,
        Capability::ManageCategories,
        Capability::ManageServices,
        Capability::ManageBeds,
        Capability::ViewCases,
        Capability::CreateCases,
        Capability::ViewBedRequests,
        Capability::CreateBedRequest,
        Capability::AssignBed,
        Capability::CheckInBed,
        Capability::CheckOutBed,
        Capability::DenyBedRequest,
        Capability::CreateAssessments,
        Capability::ManageGlobalAssessments,
        Capability::DeleteOutcomes,
        Capability::ManageRentalSubsidies,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewUsers => "can_view_users",
            Capability::CreateUsers => "can_create_users",
            Capability::UpdateUsers => "can_update_users",
            Capability::UpdateRoles => "can_update_roles",
            Capability::UpdateUserStatus => "can_update_user_status",
            Capability::ApproveAgentRequests => "can_approve_agent_requests",
            Capability::ManageAgencies => "can_manage_agencies",
            Capability::ManageLocations => "can_manage_locations",
            Capability::ManageCategories => "can_manage_categories",
            Capability::ManageServices => "can_manage_services",
            Capability::ManageBeds => "can_manage_beds",
            Capability::ViewCases => "can_view_cases",
            Capability::CreateCases => "can_create_cases",
            Capability::ViewBedRequests => "can_view_bed_requests",
            Capability::CreateBedRequest => "can_create_bed_request",
            Capability::AssignBed => "can_assign_bed",
            Capability::CheckInBed => "can_check_in_bed",
            Capability::CheckOutBed => "can_check_out_bed",
            Capability::DenyBedRequest => "can_deny_bed_request",
            Capability::CreateAssessments => "can_create_assessments",
            Capability::ManageGlobalAssessments => "can_manage_global_assessments",
            Capability::DeleteOutcomes => "can_delete_outcomes",
            Capability::ManageRentalSubsidies => "can_manage_rental_subsidies",
        }
    }

    pub const fn granted(&self, flags: &CapabilityFlags) -> bool {
        match self {
            Capability::ViewUsers => flags.can_view_users,
            Capability::CreateUsers => flags.can_create_users,
            Capability::UpdateUsers => flags.can_update_users,
            Capability::UpdateRoles => flags.can_update_roles,
            Capability::UpdateUserStatus => flags.can_update_user_status,
            Capability::ApproveAgentRequests => flags.can_approve_agent_requests,
            Capability::ManageAgencies => flags.can_manage_agencies,
            Capability::ManageLocations => flags.can_manage_locations,
            Capability::ManageCategories => flags.can_manage_categories,
            Capability::ManageServices => flags.can_manage_services,
            Capability::ManageBeds => flags.can_manage_beds,
            Capability::ViewCases => flags.can_view_cases,
            Capability::CreateCases => flags.can_create_cases,
            Capability::ViewBedRequests => flags.can_view_bed_requests,
            Capability::CreateBedRequest => flags.can_create_bed_request,
            Capability::AssignBed => flags.can_assign_bed,
            Capability::CheckInBed => flags.can_check_in_bed,
            Capability::CheckOutBed => flags.can_check_out_bed,
            Capability::DenyBedRequest => flags.can_deny_bed_request,
            Capability::CreateAssessments => flags.can_create_assessments,
            Capability::ManageGlobalAssessments => flags.can_manage_global_assessments,
            Capability::DeleteOutcomes => flags.can_delete_outcomes,
            Capability::ManageRentalSubsidies => flags.can_manage_rental_subsidies,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable view of a bundle for UI gating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySummary {
    pub role: Option<Role>,
    #[serde(flatten)]
    pub flags: CapabilityFlags,
    pub allowed_roles_to_assign: Vec<Role>,
}

/// Capabilities of one acting user
///
/// Flags are public; predicates take the target record explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub flags: CapabilityFlags,
    /// Present only when the principal is active and has a known role
    grant: Option<Grant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Grant {
    role: Role,
    user_id: i64,
    company_id: i64,
    active_location: Option<i64>,
}

impl Capabilities {
    /// Bundle that grants nothing
    pub const fn none() -> Self {
        Self {
            flags: CapabilityFlags::NONE,
            grant: None,
        }
    }

    pub fn resolve(principal: Option<&Principal>) -> Self {
        let Some(principal) = principal.filter(|p| p.is_active) else {
            return Self::none();
        };
        let Some(role) = principal.role else {
            return Self::none();
        };

        Self {
            flags: CapabilityFlags::for_role(role),
            grant: Some(Grant {
                role,
                user_id: principal.user_id,
                company_id: principal.company_id,
                active_location: principal.active_location,
            }),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.grant.as_ref().map(|g| g.role)
    }

    pub fn has(&self, capability: Capability) -> bool {
        capability.granted(&self.flags)
    }

    pub fn allowed_roles_to_assign(&self) -> &'static [Role] {
        match &self.grant {
            Some(grant) => grant.role.allowed_roles_to_assign(),
            None => &[],
        }
    }

    /// Target belongs to the acting agency and, when a location is active,
    /// to that location or to the agency as a whole
    pub fn in_scope(&self, target: &impl Scoped) -> bool {
        let Some(grant) = &self.grant else {
            return false;
        };
        if target.agency_id() != grant.company_id {
            return false;
        }
        match (grant.active_location, target.location_id()) {
            (Some(active), Some(location)) => active == location,
            _ => true,
        }
    }

    fn is_owner(&self, target: &impl Scoped) -> bool {
        match (&self.grant, target.owner_id()) {
            (Some(grant), Some(owner)) => grant.user_id == owner,
            _ => false,
        }
    }

    pub fn can_assign_role(&self, role: Role) -> bool {
        self.allowed_roles_to_assign().contains(&role)
    }

    pub fn can_update_status(&self, target: &User) -> bool {
        if !self.flags.can_update_user_status {
            return false;
        }
        !(self.role() == Some(Role::AgencyAdministrator)
            && target.role() == Some(Role::NetworkAdministrator))
    }

    pub fn can_modify_user(&self, target: &User) -> bool {
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) => {
                self.in_scope(target) && target.role() != Some(Role::NetworkAdministrator)
            }
            Some(Role::Agent) | None => false,
        }
    }

    pub fn can_delete_and_edit_comments(&self, comment: &Comment) -> bool {
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) => self.in_scope(comment),
            Some(Role::Agent) => self.is_owner(comment),
            None => false,
        }
    }

    pub fn can_manage_rental_subsidy_record(&self, record: &RentalSubsidyRecord) -> bool {
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) => self.in_scope(record),
            Some(Role::Agent) => self.is_owner(record) && self.in_scope(record),
            None => false,
        }
    }

    pub fn can_edit_assessment(&self, assessment: &Assessment) -> bool {
        if assessment.is_global {
            return self.role() == Some(Role::NetworkAdministrator);
        }
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) => self.in_scope(assessment),
            Some(Role::Agent) => self.is_owner(assessment),
            None => false,
        }
    }

    pub fn can_edit_bed_request(&self, assignment: &BedAssignment) -> bool {
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) => self.in_scope(assignment),
            Some(Role::Agent) => {
                self.is_owner(assignment)
                    && self.in_scope(assignment)
                    && assignment.status == BedStatus::Requested
            }
            None => false,
        }
    }

    pub fn can_delete_bed_request(&self, assignment: &BedAssignment) -> bool {
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) => self.in_scope(assignment),
            Some(Role::Agent) => {
                self.is_owner(assignment) && assignment.status == BedStatus::Requested
            }
            None => false,
        }
    }

    pub fn can_view_bed_request(&self, assignment: &BedAssignment) -> bool {
        match self.role() {
            Some(Role::NetworkAdministrator) => true,
            Some(Role::AgencyAdministrator) | Some(Role::Agent) => self.in_scope(assignment),
            None => false,
        }
    }

    pub fn summary(&self) -> CapabilitySummary {
        CapabilitySummary {
            role: self.role(),
            flags: self.flags,
            allowed_roles_to_assign: self.allowed_roles_to_assign().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckInDetails;
    use chrono::NaiveDate;

    const AGENCY: i64 = 10;
    const OTHER_AGENCY: i64 = 20;
    const LOCATION: i64 = 11;
    const OTHER_LOCATION: i64 = 12;

    fn principal(role: &str) -> Principal {
        Principal {
            user_id: 1,
            role: Role::parse(role),
            company_id: AGENCY,
            active_location: None,
            is_active: true,
        }
    }

    fn caps(role: &str) -> Capabilities {
        Capabilities::resolve(Some(&principal(role)))
    }

    fn caps_at(role: &str, location: i64) -> Capabilities {
        let mut p = principal(role);
        p.active_location = Some(location);
        Capabilities::resolve(Some(&p))
    }

    fn user(id: i64, role: &str, company_id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            display_name: format!("User {id}"),
            property_role: role.to_string(),
            company_id,
            active_location: None,
            is_active: true,
            created_at: 0,
        }
    }

    fn assignment(status: BedStatus, created_by: i64, location_id: Option<i64>) -> BedAssignment {
        BedAssignment {
            id: 5,
            case_id: 7,
            agency_id: AGENCY,
            location_id,
            site_id: 3,
            bed_id: None,
            status,
            arrival_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            request_notes: None,
            deny_reason: None,
            check_in_details: None,
            check_out_details: None,
            scheduled_checkout_date: None,
            created_by,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn comment(created_by: i64, agency_id: i64) -> Comment {
        Comment {
            id: 1,
            case_id: 7,
            agency_id,
            location_id: None,
            created_by,
            body: "note".into(),
        }
    }

    fn assessment(created_by: i64, is_global: bool) -> Assessment {
        Assessment {
            id: 1,
            agency_id: AGENCY,
            location_id: None,
            created_by,
            name: "Intake".into(),
            is_global,
        }
    }

    fn subsidy(created_by: i64, agency_id: i64) -> RentalSubsidyRecord {
        RentalSubsidyRecord {
            id: 1,
            case_id: 7,
            agency_id,
            location_id: None,
            created_by,
            amount_cents: 50_000,
        }
    }

    fn assert_grants_nothing(caps: &Capabilities) {
        assert_eq!(caps.flags, CapabilityFlags::NONE);
        for capability in Capability::ALL {
            assert!(!caps.has(capability), "{capability}");
        }
        assert!(caps.allowed_roles_to_assign().is_empty());
        for role in Role::ALL {
            assert!(!caps.can_assign_role(role));
        }

        let target = user(2, "Agent", AGENCY);
        assert!(!caps.can_update_status(&target));
        assert!(!caps.can_modify_user(&target));
        assert!(!caps.can_delete_and_edit_comments(&comment(1, AGENCY)));
        assert!(!caps.can_manage_rental_subsidy_record(&subsidy(1, AGENCY)));
        assert!(!caps.can_edit_assessment(&assessment(1, false)));
        assert!(!caps.can_edit_assessment(&assessment(1, true)));
        let request = assignment(BedStatus::Requested, 1, None);
        assert!(!caps.can_edit_bed_request(&request));
        assert!(!caps.can_delete_bed_request(&request));
        assert!(!caps.can_view_bed_request(&request));
        assert!(!caps.in_scope(&request));
    }

    #[test]
    fn test_unknown_roles_grant_nothing() {
        for role in ["", "Admin", "agent", "Supervisor", "Network administrator"] {
            assert_grants_nothing(&caps(role));
        }
    }

    #[test]
    fn test_absent_principal_grants_nothing() {
        assert_grants_nothing(&Capabilities::resolve(None));
        assert_grants_nothing(&Capabilities::none());
    }

    #[test]
    fn test_inactive_principal_grants_nothing() {
        let mut p = principal("Network Administrator");
        p.is_active = false;
        assert_grants_nothing(&Capabilities::resolve(Some(&p)));
    }

    #[test]
    fn test_flag_table() {
        let na = caps("Network Administrator").flags;
        let aa = caps("Agency Administrator").flags;
        let agent = caps("Agent").flags;

        assert!(na.can_manage_agencies && !aa.can_manage_agencies && !agent.can_manage_agencies);
        assert!(na.can_manage_global_assessments && !aa.can_manage_global_assessments);
        assert!(na.can_delete_outcomes && !aa.can_delete_outcomes && !agent.can_delete_outcomes);

        for flags in [na, aa] {
            assert!(flags.can_view_users && flags.can_create_users && flags.can_update_roles);
            assert!(flags.can_assign_bed && flags.can_check_in_bed && flags.can_check_out_bed);
            assert!(flags.can_deny_bed_request && flags.can_manage_beds);
        }

        assert!(!agent.can_view_users && !agent.can_create_users);
        assert!(!agent.can_assign_bed && !agent.can_check_in_bed && !agent.can_check_out_bed);
        assert!(!agent.can_deny_bed_request && !agent.can_manage_beds);
        for flags in [na, aa, agent] {
            assert!(flags.can_view_cases && flags.can_create_cases);
            assert!(flags.can_view_bed_requests && flags.can_create_bed_request);
            assert!(flags.can_create_assessments && flags.can_manage_rental_subsidies);
        }
    }

    #[test]
    fn test_capability_names_match_flag_fields() {
        let json = serde_json::to_value(CapabilityFlags::for_role(Role::NetworkAdministrator))
            .unwrap();
        for capability in Capability::ALL {
            assert_eq!(json[capability.as_str()], true, "{capability}");
        }
    }

    #[test]
    fn test_can_assign_role_follows_allowed_set() {
        for actor in Role::ALL {
            let caps = caps(actor.as_str());
            for role in Role::ALL {
                assert_eq!(
                    caps.can_assign_role(role),
                    actor.allowed_roles_to_assign().contains(&role),
                    "{actor} assigning {role}"
                );
            }
        }
    }

    #[test]
    fn test_agency_admin_cannot_update_network_admin_status() {
        let aa = caps("Agency Administrator");
        assert!(!aa.can_update_status(&user(2, "Network Administrator", AGENCY)));
        assert!(aa.can_update_status(&user(2, "Agency Administrator", AGENCY)));
        assert!(aa.can_update_status(&user(2, "Agent", AGENCY)));

        let na = caps("Network Administrator");
        assert!(na.can_update_status(&user(2, "Network Administrator", AGENCY)));

        let agent = caps("Agent");
        assert!(!agent.can_update_status(&user(2, "Agent", AGENCY)));
    }

    #[test]
    fn test_can_modify_user() {
        let na = caps("Network Administrator");
        assert!(na.can_modify_user(&user(2, "Network Administrator", OTHER_AGENCY)));

        let aa = caps("Agency Administrator");
        assert!(aa.can_modify_user(&user(2, "Agent", AGENCY)));
        assert!(!aa.can_modify_user(&user(2, "Agent", OTHER_AGENCY)));
        assert!(!aa.can_modify_user(&user(2, "Network Administrator", AGENCY)));

        assert!(!caps("Agent").can_modify_user(&user(1, "Agent", AGENCY)));
    }

    #[test]
    fn test_scope_with_active_location() {
        let aa = caps_at("Agency Administrator", LOCATION);
        assert!(aa.in_scope(&assignment(BedStatus::Requested, 9, None)));
        assert!(aa.in_scope(&assignment(BedStatus::Requested, 9, Some(LOCATION))));
        assert!(!aa.in_scope(&assignment(BedStatus::Requested, 9, Some(OTHER_LOCATION))));

        let agency_wide = caps("Agency Administrator");
        assert!(agency_wide.in_scope(&assignment(BedStatus::Requested, 9, Some(OTHER_LOCATION))));
    }

    #[test]
    fn test_comment_predicates() {
        assert!(caps("Network Administrator").can_delete_and_edit_comments(&comment(9, OTHER_AGENCY)));
        assert!(caps("Agency Administrator").can_delete_and_edit_comments(&comment(9, AGENCY)));
        assert!(!caps("Agency Administrator").can_delete_and_edit_comments(&comment(9, OTHER_AGENCY)));
        assert!(caps("Agent").can_delete_and_edit_comments(&comment(1, AGENCY)));
        assert!(!caps("Agent").can_delete_and_edit_comments(&comment(9, AGENCY)));
    }

    #[test]
    fn test_rental_subsidy_predicates() {
        let agent = caps("Agent");
        assert!(agent.can_manage_rental_subsidy_record(&subsidy(1, AGENCY)));
        assert!(!agent.can_manage_rental_subsidy_record(&subsidy(1, OTHER_AGENCY)));
        assert!(!agent.can_manage_rental_subsidy_record(&subsidy(9, AGENCY)));
        assert!(caps("Agency Administrator").can_manage_rental_subsidy_record(&subsidy(9, AGENCY)));
    }

    #[test]
    fn test_global_assessments_are_network_admin_only() {
        assert!(caps("Network Administrator").can_edit_assessment(&assessment(9, true)));
        assert!(!caps("Agency Administrator").can_edit_assessment(&assessment(1, true)));
        assert!(!caps("Agent").can_edit_assessment(&assessment(1, true)));

        assert!(caps("Agency Administrator").can_edit_assessment(&assessment(9, false)));
        assert!(caps("Agent").can_edit_assessment(&assessment(1, false)));
        assert!(!caps("Agent").can_edit_assessment(&assessment(9, false)));
    }

    #[test]
    fn test_agent_bed_request_predicates() {
        let agent = caps("Agent");
        let own_requested = assignment(BedStatus::Requested, 1, None);
        assert!(agent.can_edit_bed_request(&own_requested));
        assert!(agent.can_delete_bed_request(&own_requested));
        assert!(agent.can_view_bed_request(&own_requested));

        let mut own_active = assignment(BedStatus::ActiveOccupant, 1, None);
        own_active.check_in_details = Some(CheckInDetails {
            check_in_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            notes: None,
            bed_id: 4,
            bed_name: "A1".into(),
            room_name: None,
            bed_type: None,
        });
        assert!(!agent.can_edit_bed_request(&own_active));
        assert!(!agent.can_delete_bed_request(&own_active));

        let other_requested = assignment(BedStatus::Requested, 9, None);
        assert!(!agent.can_edit_bed_request(&other_requested));
        assert!(!agent.can_delete_bed_request(&other_requested));
        assert!(agent.can_view_bed_request(&other_requested));
    }

    #[test]
    fn test_admin_bed_request_predicates() {
        let aa = caps_at("Agency Administrator", LOCATION);
        let in_location = assignment(BedStatus::CheckedInOut, 9, Some(LOCATION));
        let elsewhere = assignment(BedStatus::Denied, 9, Some(OTHER_LOCATION));
        assert!(aa.can_edit_bed_request(&in_location));
        assert!(aa.can_delete_bed_request(&in_location));
        assert!(!aa.can_edit_bed_request(&elsewhere));
        assert!(!aa.can_view_bed_request(&elsewhere));

        let na = caps_at("Network Administrator", LOCATION);
        assert!(na.can_view_bed_request(&elsewhere));
        assert!(na.can_delete_bed_request(&elsewhere));
    }

    #[test]
    fn test_summary_serializes_flat_flags() {
        let summary = caps("Agency Administrator").summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["role"], "Agency Administrator");
        assert_eq!(json["can_assign_bed"], true);
        assert_eq!(json["can_manage_agencies"], false);
        assert_eq!(
            json["allowed_roles_to_assign"],
            serde_json::json!(["Agency Administrator", "Agent"])
        );

        let back: CapabilitySummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
