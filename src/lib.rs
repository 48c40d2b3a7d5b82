//! Effect-mix simulator and minimum-cost unmix solver.
//!
//! Given a catalog of base products and additives (each additive carrying a
//! priority-ordered table of effect-transformation clauses), this crate
//! deterministically simulates mixing ([`mix::mix`]) and searches for the
//! cheapest additive sequence that achieves a requested effect set
//! ([`search::unmix`], [`search::unmix_best_base`]).
//!
//! The catalog is loaded once into an immutable structure and shared
//! read-only across every engine call; rank gating, the target-size cap,
//! and cancellation are explicit per-call inputs, so both engines are pure
//! with respect to everything outside their arguments.

pub mod catalog;
pub mod effect;
pub mod error;
pub mod mix;
pub mod pricing;
pub mod rank;
pub mod search;

pub use catalog::{Additive, AdditiveId, BaseId, BaseProduct, Catalog, ClauseDef, Effect, Money};
pub use effect::{EffectId, EffectSet, MAX_EFFECTS};
pub use error::{CatalogError, UnmixError};
pub use mix::{mix, mix_ids, MixPath, MixStep};
pub use pricing::{cost_breakdown, sell_price, PriceBreakdown};
pub use rank::{RankFilter, Unlock};
pub use search::{
    unmix, unmix_best_base, CancelToken, ParallelConfig, SearchStatistics, Solution, UnmixConfig,
    UnmixOutcome,
};
