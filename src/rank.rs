//! Rank-based unlock gating for catalog items.
//!
//! The rank ladder is an ordered list of rank names owned by the catalog.
//! Items carry an [`Unlock`] requirement resolved against the ladder at load
//! time; callers decide what is selectable by passing an explicit
//! [`RankFilter`] into the candidate-pool helpers. The engines themselves
//! never consult rank state.

/// Unlock requirement of a base product or additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    /// No rank requirement; available from the start.
    Always,
    /// Available once the player reaches the ladder index (0 = first rank).
    AtRank(u16),
    /// Rank name not on the ladder; never unlocked by progression.
    Never,
}

/// The caller's progression state for one mix/unmix invocation.
///
/// Read once per call and treated as immutable for its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankFilter {
    /// Override: everything is selectable.
    #[default]
    UnlockAll,
    /// Current position on the rank ladder.
    AtRank(u16),
}

impl RankFilter {
    pub fn is_unlocked(self, unlock: Unlock) -> bool {
        match (self, unlock) {
            (RankFilter::UnlockAll, _) => true,
            (RankFilter::AtRank(_), Unlock::Always) => true,
            (RankFilter::AtRank(current), Unlock::AtRank(required)) => required <= current,
            (RankFilter::AtRank(_), Unlock::Never) => false,
        }
    }
}
