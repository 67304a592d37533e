/// What a caller does after the vendor reports its token as expired.
///
/// `PerCall` refreshes unconditionally, so N callers hitting the sentinel at
/// once issue N token requests. The vendor treats these as idempotent.
/// `SingleFlight` skips the refresh when the token that was rejected has
/// already been replaced by another caller.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshPolicy {
    #[default]
    PerCall,
    SingleFlight,
}

impl RefreshPolicy {
    /// Whether a forced refresh should go to the network, given whether the
    /// rejected token is still the one being held.
    pub(crate) fn should_refresh(self, rejected_still_held: bool) -> bool {
        match self {
            RefreshPolicy::PerCall => true,
            RefreshPolicy::SingleFlight => rejected_still_held,
        }
    }
}
