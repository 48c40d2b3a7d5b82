//! Unmix search: cost-minimizing exploration of additive sequences.
//!
//! Two entry points share one core:
//! - [`unmix`]: cheapest sequence for a fixed base product
//! - [`unmix_best_base`]: independent per-base searches on worker threads,
//!   reduced to the globally cheapest solution
//!
//! Both are uniform-cost searches over effect-set states with dominance
//! pruning, deterministic tie-breaking, and cooperative cancellation.

pub mod cancel;
pub mod config;
pub mod parallel;
pub mod result;
pub mod unmix;

pub use cancel::CancelToken;
pub use config::{UnmixConfig, DEFAULT_MAX_STEPS, DEFAULT_TARGET_CAP};
pub use parallel::{unmix_best_base, ParallelConfig};
pub use result::{SearchStatistics, Solution, UnmixOutcome};
pub use unmix::unmix;
