//! Uniform-cost search for the cheapest additive sequence reaching a target
//! effect set.
//!
//! The frontier is ordered by (accumulated cost, sequence length,
//! lexicographic additive ids), so the first goal state popped is minimal
//! and ties resolve the same way on every run. State identity for
//! deduplication is the effect set alone; because `max_steps` bounds depth,
//! an entry dominates a rediscovery only when it is no worse on *both* cost
//! and length, and each effect set keeps the small Pareto frontier of
//! (cost, length) pairs seen so far. That dominance pruning is what keeps
//! the otherwise exponential frontier tractable, and the bitset state
//! encoding is what keeps the dedup lookup cheap.

use crate::catalog::{AdditiveId, BaseId, Catalog, Money};
use crate::effect::EffectSet;
use crate::error::UnmixError;
use crate::mix::{apply_additive, mix_ids};
use crate::search::cancel::CancelToken;
use crate::search::config::UnmixConfig;
use crate::search::result::{SearchStatistics, Solution, UnmixOutcome};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;
use tracing::debug;

/// Frontier expansions between cancellation polls.
const CANCEL_POLL_INTERVAL: u64 = 64;

/// Find the cheapest additive sequence (repetition allowed, at most
/// `config.max_steps` long, drawn from `candidates`) whose resulting effect
/// set covers `target` when applied to `base`.
///
/// `candidates` is the caller's already-rank-filtered pool; the search never
/// re-checks unlock status. Unknown-name resolution happens before this
/// call, so the only errors here are request-validation ones.
pub fn unmix(
    catalog: &Catalog,
    base: BaseId,
    target: EffectSet,
    candidates: &[AdditiveId],
    config: &UnmixConfig,
    cancel: &CancelToken,
) -> Result<UnmixOutcome, UnmixError> {
    validate_target(target, config)?;
    Ok(search_single_base(
        catalog, base, target, candidates, config, cancel,
    ))
}

/// Reject requests the search should not run at all.
pub(crate) fn validate_target(target: EffectSet, config: &UnmixConfig) -> Result<(), UnmixError> {
    if target.is_empty() {
        return Err(UnmixError::EmptyTarget);
    }
    if target.len() > config.max_target_effects {
        return Err(UnmixError::TargetTooLarge {
            requested: target.len(),
            cap: config.max_target_effects,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    cost: Money,
    additives: Vec<AdditiveId>,
    effects: EffectSet,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.additives.len().cmp(&other.additives.len()))
            .then_with(|| self.additives.cmp(&other.additives))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// (cost, length) pairs already accepted for one effect set.
type Visited = HashMap<u64, Vec<(Money, u32)>>;

fn dominates(a: (Money, u32), b: (Money, u32)) -> bool {
    a.0 <= b.0 && a.1 <= b.1
}

/// Core search over one base. Assumes the request was validated.
pub(crate) fn search_single_base(
    catalog: &Catalog,
    base: BaseId,
    target: EffectSet,
    candidates: &[AdditiveId],
    config: &UnmixConfig,
    cancel: &CancelToken,
) -> UnmixOutcome {
    let start_time = Instant::now();
    let mut statistics = SearchStatistics {
        bases_searched: 1,
        ..Default::default()
    };

    debug!(
        base = %catalog.base(base).name,
        candidates = candidates.len(),
        max_steps = config.max_steps,
        "unmix search started"
    );

    if cancel.is_cancelled() {
        statistics.elapsed = start_time.elapsed();
        return UnmixOutcome::Cancelled { statistics };
    }

    let start = Node {
        cost: Money::ZERO,
        additives: Vec::new(),
        effects: catalog.base(base).effects,
    };

    let mut heap: BinaryHeap<Reverse<Node>> = BinaryHeap::new();
    let mut visited: Visited = HashMap::new();
    visited
        .entry(start.effects.bits())
        .or_default()
        .push((Money::ZERO, 0));
    heap.push(Reverse(start));
    statistics.enqueued += 1;

    let mut since_poll = 0u64;

    while let Some(Reverse(node)) = heap.pop() {
        since_poll += 1;
        if since_poll >= CANCEL_POLL_INTERVAL {
            since_poll = 0;
            if cancel.is_cancelled() {
                debug!("unmix search cancelled");
                statistics.elapsed = start_time.elapsed();
                return UnmixOutcome::Cancelled { statistics };
            }
        }

        let key = (node.cost, node.additives.len() as u32);
        let current = visited.get(&node.effects.bits());
        if !current.is_some_and(|entries| entries.contains(&key)) {
            // Superseded by a dominating path after being enqueued.
            statistics.stale += 1;
            continue;
        }
        statistics.expanded += 1;

        if node.effects.is_superset_of(target) {
            statistics.elapsed = start_time.elapsed();
            debug!(
                cost = %node.cost,
                steps = node.additives.len(),
                "unmix search found a solution"
            );
            let path = mix_ids(catalog, base, &node.additives);
            return UnmixOutcome::Found {
                solution: Solution {
                    base,
                    additives: node.additives,
                    path,
                    cost: node.cost,
                },
                statistics,
            };
        }

        if node.additives.len() >= config.max_steps {
            continue;
        }

        for &additive in candidates {
            let effects = apply_additive(catalog.additive(additive), node.effects);
            let cost = node.cost.saturating_add(catalog.additive(additive).cost);
            let steps = node.additives.len() as u32 + 1;

            let entries = visited.entry(effects.bits()).or_default();
            if entries.iter().any(|&seen| dominates(seen, (cost, steps))) {
                statistics.pruned += 1;
                continue;
            }
            entries.retain(|&seen| !dominates((cost, steps), seen));
            entries.push((cost, steps));

            let mut additives = node.additives.clone();
            additives.push(additive);
            heap.push(Reverse(Node {
                cost,
                additives,
                effects,
            }));
            statistics.enqueued += 1;
        }
    }

    statistics.elapsed = start_time.elapsed();
    debug!("unmix search exhausted the frontier");
    UnmixOutcome::NotFound { statistics }
}
