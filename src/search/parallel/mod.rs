//! Best-of-all-bases search across worker threads.
//!
//! "Pick the best base for me" runs one independent single-base search per
//! candidate base. Searches share nothing but the read-only catalog and the
//! cancellation token, so they parallelize freely: workers claim bases from
//! a shared counter, send each finished outcome over a channel, and the
//! calling thread performs the only shared-write step: a single-writer
//! minimum reduction with deterministic tie-breaking.

use crate::catalog::{AdditiveId, BaseId, Catalog};
use crate::effect::EffectSet;
use crate::error::UnmixError;
use crate::search::cancel::CancelToken;
use crate::search::config::UnmixConfig;
use crate::search::result::{SearchStatistics, Solution, UnmixOutcome};
use crate::search::unmix::{search_single_base, validate_target};
use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Worker-pool sizing for best-of-all-bases searches.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads to spawn (capped by the number of bases).
    pub num_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
        }
    }
}

impl ParallelConfig {
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }
}

/// Run an independent search for every candidate base and return the
/// globally minimal-cost solution; ties break by (length, sequence, base id)
/// so results are reproducible regardless of worker scheduling.
pub fn unmix_best_base(
    catalog: &Catalog,
    bases: &[BaseId],
    target: EffectSet,
    candidates: &[AdditiveId],
    config: &UnmixConfig,
    parallel: &ParallelConfig,
    cancel: &CancelToken,
) -> Result<UnmixOutcome, UnmixError> {
    validate_target(target, config)?;

    let start_time = Instant::now();
    let mut statistics = SearchStatistics::default();

    if bases.is_empty() {
        debug!("no candidate bases; nothing reachable");
        statistics.elapsed = start_time.elapsed();
        return Ok(UnmixOutcome::NotFound { statistics });
    }

    let num_workers = parallel.num_workers.min(bases.len()).max(1);
    info!(
        bases = bases.len(),
        workers = num_workers,
        "best-of-all-bases search started"
    );

    let (tx, rx) = unbounded::<UnmixOutcome>();
    let next_base = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let next_base = &next_base;
            scope.spawn(move || {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let index = next_base.fetch_add(1, Ordering::SeqCst);
                    let Some(&base) = bases.get(index) else {
                        break;
                    };
                    let outcome =
                        search_single_base(catalog, base, target, candidates, config, cancel);
                    // Receiver outlives the scope; a send failure is unreachable.
                    let _ = tx.send(outcome);
                }
            });
        }
    });
    drop(tx);

    let mut cancelled = false;
    let mut best: Option<Solution> = None;
    for outcome in rx.iter() {
        statistics.merge(outcome.statistics());
        match outcome {
            UnmixOutcome::Cancelled { .. } => cancelled = true,
            UnmixOutcome::NotFound { .. } => {}
            UnmixOutcome::Found { solution, .. } => {
                if best.as_ref().map_or(true, |b| better(&solution, b)) {
                    best = Some(solution);
                }
            }
        }
    }

    statistics.elapsed = start_time.elapsed();

    if cancelled || cancel.is_cancelled() {
        info!("best-of-all-bases search cancelled");
        return Ok(UnmixOutcome::Cancelled { statistics });
    }

    match best {
        Some(solution) => {
            info!(
                base = %catalog.base(solution.base).name,
                cost = %solution.cost,
                "best-of-all-bases search found a solution"
            );
            Ok(UnmixOutcome::Found {
                solution,
                statistics,
            })
        }
        None => Ok(UnmixOutcome::NotFound { statistics }),
    }
}

/// Strictly-better-than ordering for the final reduction.
fn better(a: &Solution, b: &Solution) -> bool {
    (a.cost, a.additives.len(), &a.additives, a.base)
        < (b.cost, b.additives.len(), &b.additives, b.base)
}
