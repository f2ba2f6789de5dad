//! Agency / location scoping of target records

/// A record a capability predicate can be asked about
pub trait Scoped {
    /// Owning agency
    fn agency_id(&self) -> i64;

    /// Location inside the agency; `None` means agency-wide
    fn location_id(&self) -> Option<i64>;

    /// Creator, when the record has one
    fn owner_id(&self) -> Option<i64>;
}
