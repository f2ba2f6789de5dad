//! Role-scoped access control
//!
//! [`Capabilities::resolve`] turns the acting [`Principal`] into a bundle of
//! boolean flags plus predicates over target records. Resolution is pure and
//! fails closed: no principal, an inactive principal or an unknown role all
//! yield a bundle that grants nothing.

mod capabilities;
mod principal;
mod role;
mod scope;

pub use capabilities::{Capabilities, Capability, CapabilityFlags, CapabilitySummary};
pub use principal::Principal;
pub use role::{Role, UnknownRole};
pub use scope::Scoped;
