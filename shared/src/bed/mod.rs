//! Bed workflow
//!
//! [`BedStatus`] is the lifecycle of a case's claim on a bed and
//! [`validation`] holds the form rules each workflow step enforces.

mod status;
pub mod validation;

pub use status::{BedAction, BedStatus, InvalidTransition, UnknownBedStatus};
