//! Bed status machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Status of a bed request / assignment
///
/// ```text
/// REQUESTED ──check-in──▶ ACTIVE OCCUPANT ──schedule──▶ SCHEDULED CHECKOUT
///     │                        │                              │
///     └─deny─▶ DENIED          └────────check-out─────────────┴──▶ CHECKEDIN-OUT
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum BedStatus {
    #[serde(rename = "REQUESTED")]
    #[cfg_attr(feature = "db", sqlx(rename = "REQUESTED"))]
    Requested,
    #[serde(rename = "DENIED")]
    #[cfg_attr(feature = "db", sqlx(rename = "DENIED"))]
    Denied,
    #[serde(rename = "ACTIVE OCCUPANT")]
    #[cfg_attr(feature = "db", sqlx(rename = "ACTIVE OCCUPANT"))]
    ActiveOccupant,
    #[serde(rename = "SCHEDULED CHECKOUT")]
    #[cfg_attr(feature = "db", sqlx(rename = "SCHEDULED CHECKOUT"))]
    ScheduledCheckout,
    #[serde(rename = "CHECKEDIN-OUT")]
    #[cfg_attr(feature = "db", sqlx(rename = "CHECKEDIN-OUT"))]
    CheckedInOut,
}

/// Workflow step applied to an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedAction {
    CheckIn,
    Deny,
    ScheduleCheckout,
    CheckOut,
    EditRequest,
    EditStay,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} a bed request in status {from}")]
pub struct InvalidTransition {
    pub from: BedStatus,
    pub action: BedAction,
}

impl From<InvalidTransition> for AppError {
    fn from(err: InvalidTransition) -> Self {
        AppError::with_message(ErrorCode::InvalidBedTransition, err.to_string())
            .with_detail("status", err.from.as_str())
            .with_detail("action", err.action.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bed status: {0}")]
pub struct UnknownBedStatus(pub String);

impl BedStatus {
    pub const ALL: [BedStatus; 5] = [
        BedStatus::Requested,
        BedStatus::Denied,
        BedStatus::ActiveOccupant,
        BedStatus::ScheduledCheckout,
        BedStatus::CheckedInOut,
    ];

    /// Statuses in which the case holds the bed
    pub const ACTIVE: [BedStatus; 2] = [BedStatus::ActiveOccupant, BedStatus::ScheduledCheckout];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Requested => "REQUESTED",
            BedStatus::Denied => "DENIED",
            BedStatus::ActiveOccupant => "ACTIVE OCCUPANT",
            BedStatus::ScheduledCheckout => "SCHEDULED CHECKOUT",
            BedStatus::CheckedInOut => "CHECKEDIN-OUT",
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self, BedStatus::ActiveOccupant | BedStatus::ScheduledCheckout)
    }

    /// Status after `action`, or the reason it is not allowed
    ///
    /// Edits and delete leave the status unchanged.
    pub fn apply(self, action: BedAction) -> Result<BedStatus, InvalidTransition> {
        use BedAction as A;
        use BedStatus as S;

        let next = match (self, action) {
            (S::Requested, A::CheckIn) => S::ActiveOccupant,
            (S::Requested, A::Deny) => S::Denied,
            (S::ActiveOccupant, A::ScheduleCheckout) => S::ScheduledCheckout,
            (S::ActiveOccupant | S::ScheduledCheckout, A::CheckOut) => S::CheckedInOut,
            (S::Requested | S::Denied, A::EditRequest) => self,
            (S::ActiveOccupant | S::ScheduledCheckout | S::CheckedInOut, A::EditStay) => self,
            (_, A::Delete) => self,
            _ => return Err(InvalidTransition { from: self, action }),
        };
        Ok(next)
    }

    pub fn allows(self, action: BedAction) -> bool {
        self.apply(action).is_ok()
    }

    /// Actions a UI may offer for a record in this status
    pub fn available_actions(self) -> Vec<BedAction> {
        BedAction::ALL
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

impl BedAction {
    pub const ALL: [BedAction; 7] = [
        BedAction::CheckIn,
        BedAction::Deny,
        BedAction::ScheduleCheckout,
        BedAction::CheckOut,
        BedAction::EditRequest,
        BedAction::EditStay,
        BedAction::Delete,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BedAction::CheckIn => "check_in",
            BedAction::Deny => "deny",
            BedAction::ScheduleCheckout => "schedule_checkout",
            BedAction::CheckOut => "check_out",
            BedAction::EditRequest => "edit_request",
            BedAction::EditStay => "edit_stay",
            BedAction::Delete => "delete",
        }
    }
}

impl fmt::Display for BedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BedStatus {
    type Err = UnknownBedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BedStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownBedStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        for status in BedStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<BedStatus>().unwrap(), status);
        }
        assert!("ACTIVE_OCCUPANT".parse::<BedStatus>().is_err());
    }

    #[test]
    fn test_happy_path() {
        let status = BedStatus::Requested;
        let status = status.apply(BedAction::CheckIn).unwrap();
        assert_eq!(status, BedStatus::ActiveOccupant);
        let status = status.apply(BedAction::ScheduleCheckout).unwrap();
        assert_eq!(status, BedStatus::ScheduledCheckout);
        let status = status.apply(BedAction::CheckOut).unwrap();
        assert_eq!(status, BedStatus::CheckedInOut);
    }

    #[test]
    fn test_check_out_directly_from_active() {
        assert_eq!(
            BedStatus::ActiveOccupant.apply(BedAction::CheckOut),
            Ok(BedStatus::CheckedInOut)
        );
    }

    #[test]
    fn test_deny_only_from_requested() {
        for status in BedStatus::ALL {
            assert_eq!(
                status.available_actions().contains(&BedAction::Deny),
                status == BedStatus::Requested,
                "{status}"
            );
        }
        assert_eq!(
            BedStatus::Requested.apply(BedAction::Deny),
            Ok(BedStatus::Denied)
        );
    }

    #[test]
    fn test_terminal_states_never_reenter_requested() {
        for terminal in [BedStatus::Denied, BedStatus::CheckedInOut] {
            for action in BedAction::ALL {
                if let Ok(next) = terminal.apply(action) {
                    assert_eq!(next, terminal, "{terminal} via {action}");
                }
            }
        }
    }

    #[test]
    fn test_invalid_transitions() {
        let err = BedStatus::Denied.apply(BedAction::CheckIn).unwrap_err();
        assert_eq!(err.from, BedStatus::Denied);
        assert_eq!(err.action, BedAction::CheckIn);
        assert_eq!(
            err.to_string(),
            "cannot check_in a bed request in status DENIED"
        );

        assert!(BedStatus::ScheduledCheckout.apply(BedAction::ScheduleCheckout).is_err());
        assert!(BedStatus::Requested.apply(BedAction::CheckOut).is_err());
        assert!(BedStatus::ActiveOccupant.apply(BedAction::EditRequest).is_err());
        assert!(BedStatus::Requested.apply(BedAction::EditStay).is_err());
    }

    #[test]
    fn test_delete_allowed_everywhere() {
        for status in BedStatus::ALL {
            assert_eq!(status.apply(BedAction::Delete), Ok(status));
        }
    }

    #[test]
    fn test_available_actions() {
        assert_eq!(
            BedStatus::Requested.available_actions(),
            vec![
                BedAction::CheckIn,
                BedAction::Deny,
                BedAction::EditRequest,
                BedAction::Delete
            ]
        );
        assert_eq!(
            BedStatus::CheckedInOut.available_actions(),
            vec![BedAction::EditStay, BedAction::Delete]
        );
    }

    #[test]
    fn test_invalid_transition_into_app_error() {
        let err: AppError = BedStatus::Denied.apply(BedAction::Deny).unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidBedTransition);
        assert_eq!(err.details.unwrap()["status"], "DENIED");
    }

    #[test]
    fn test_is_active() {
        assert!(BedStatus::ActiveOccupant.is_active());
        assert!(BedStatus::ScheduledCheckout.is_active());
        assert!(!BedStatus::Requested.is_active());
        assert!(!BedStatus::CheckedInOut.is_active());
        assert_eq!(BedStatus::ACTIVE.len(), 2);
    }
}
