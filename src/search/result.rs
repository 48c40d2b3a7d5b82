//! Unmix outcomes, solutions, and search statistics.

use crate::catalog::{AdditiveId, BaseId, Money};
use crate::mix::MixPath;
use std::time::Duration;

/// A minimal-cost way to reach a target effect set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub base: BaseId,
    /// The additive sequence, in application order.
    pub additives: Vec<AdditiveId>,
    /// Full step trace of applying the sequence to the base.
    pub path: MixPath,
    /// Sum of additive acquisition costs, the quantity the search
    /// minimized. Base acquisition is sunk and reported by pricing instead.
    pub cost: Money,
}

/// Result of an unmix search.
///
/// `NotFound` and `Cancelled` are ordinary outcomes, not errors: the first
/// means no sequence within the step bound reaches the target, the second
/// that the caller stopped the search. They are distinct so a result view
/// can say "no solution exists" vs "search cancelled". Cancellation never
/// carries a partial best-so-far.
#[derive(Debug, Clone)]
pub enum UnmixOutcome {
    Found {
        solution: Solution,
        statistics: SearchStatistics,
    },
    NotFound {
        statistics: SearchStatistics,
    },
    Cancelled {
        statistics: SearchStatistics,
    },
}

impl UnmixOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, UnmixOutcome::Found { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, UnmixOutcome::Cancelled { .. })
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            UnmixOutcome::Found { solution, .. } => Some(solution),
            _ => None,
        }
    }

    pub fn statistics(&self) -> &SearchStatistics {
        match self {
            UnmixOutcome::Found { statistics, .. }
            | UnmixOutcome::NotFound { statistics }
            | UnmixOutcome::Cancelled { statistics } => statistics,
        }
    }
}

/// Counters from one search (or the sum over per-base workers).
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// States popped and processed.
    pub expanded: u64,
    /// States pushed onto the frontier.
    pub enqueued: u64,
    /// Candidate states discarded by the dominance check.
    pub pruned: u64,
    /// Popped states skipped because a better path superseded them.
    pub stale: u64,
    /// Base products searched.
    pub bases_searched: u64,
    /// Wall time of the whole search.
    pub elapsed: Duration,
}

impl SearchStatistics {
    /// Fold another worker's counters into this one. `elapsed` takes the
    /// maximum; the coordinator overwrites it with wall time anyway.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.expanded += other.expanded;
        self.enqueued += other.enqueued;
        self.pruned += other.pruned;
        self.stale += other.stale;
        self.bases_searched += other.bases_searched;
        self.elapsed = self.elapsed.max(other.elapsed);
    }

    /// Human-readable one-per-line summary.
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed));
        s.push_str(&format!("Bases searched: {}\n", self.bases_searched));
        s.push_str(&format!("States expanded: {}\n", self.expanded));
        s.push_str(&format!("States enqueued: {}\n", self.enqueued));
        s.push_str(&format!("States pruned: {}\n", self.pruned));
        s
    }
}
