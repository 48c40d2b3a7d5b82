//! Pricing: cost breakdowns and sell-price estimation.
//!
//! Invoked by callers after a mix or a found solution, never inside the
//! search loop. The search minimizes additive cost only; base acquisition is
//! sunk and reported for information.

use crate::catalog::{AdditiveId, BaseId, Catalog, Money};
use crate::effect::EffectSet;

/// Cost of achieving a mix, split the way result views present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_cost: Money,
    pub additive_total: Money,
    pub total: Money,
}

/// Sum of acquisition costs for a sequence of additives.
pub fn additive_total(catalog: &Catalog, additives: &[AdditiveId]) -> Money {
    additives
        .iter()
        .map(|&id| catalog.additive(id).cost)
        .sum()
}

pub fn cost_breakdown(
    catalog: &Catalog,
    base: BaseId,
    additives: &[AdditiveId],
) -> PriceBreakdown {
    let base_cost = catalog.base(base).cost;
    let additive_total = additive_total(catalog, additives);
    PriceBreakdown {
        base_cost,
        additive_total,
        total: base_cost.saturating_add(additive_total),
    }
}

/// Estimated sell price: the base's sell value scaled by one plus the sum of
/// the final effects' multipliers, rounded to the nearest whole unit.
pub fn sell_price(catalog: &Catalog, base: BaseId, effects: EffectSet) -> Money {
    let multiplier_sum: f64 = effects
        .iter()
        .map(|id| catalog.effect(id).multiplier)
        .sum();
    let value = catalog.base(base).sell_value.cents() as f64 * (1.0 + multiplier_sum);
    Money::from_cents(value.max(0.0).round() as u64).round_to_unit()
}
