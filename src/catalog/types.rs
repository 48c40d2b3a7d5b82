//! Core catalog record types: money, effects, base products, additives, and
//! the rule clauses interpreted by the mixing engine.

use crate::effect::{EffectId, EffectSet};
use crate::rank::Unlock;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in whole cents.
///
/// Catalog documents carry decimal amounts (`3.75`); all engine arithmetic is
/// integral so search costs order totally and never drift. Amounts are always
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    /// Convert a decimal amount; rejects negatives, NaN, and infinities.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Money((amount * 100.0).round() as u64))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Round to the nearest whole currency unit.
    pub fn round_to_unit(self) -> Money {
        Money((self.0 + 50) / 100 * 100)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .ok_or_else(|| de::Error::custom(format!("invalid money amount {amount}")))
    }
}

/// Index of a base product in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseId(pub(crate) u16);

impl BaseId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an additive in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdditiveId(pub(crate) u16);

impl AdditiveId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named outcome attached to a mixed product.
#[derive(Debug, Clone)]
pub struct Effect {
    pub name: String,
    /// Sell-price multiplier contributed when present on the final mix.
    pub multiplier: f64,
}

/// The starting item being mixed.
#[derive(Debug, Clone)]
pub struct BaseProduct {
    pub name: String,
    /// Acquisition cost; sunk for unmix purposes, reported in breakdowns.
    pub cost: Money,
    /// Unmodified sell value, scaled by effect multipliers when pricing.
    pub sell_value: Money,
    pub unlock: Unlock,
    /// Intrinsic starting effects; may be empty.
    pub effects: EffectSet,
}

/// An ingredient with a cost, unlock rank, and transformation rule table.
#[derive(Debug, Clone)]
pub struct Additive {
    pub name: String,
    pub cost: Money,
    pub unlock: Unlock,
    /// Clause list in priority order; the mixing engine fires the first
    /// matching clause per application.
    pub rules: Vec<RuleClause>,
}

/// One transformation rule clause.
///
/// A clause matches when every required effect is present and no forbidden
/// effect is. Firing removes `remove` (if any) and then adds `add` (if any).
#[derive(Debug, Clone, Copy)]
pub struct RuleClause {
    pub required: EffectSet,
    pub forbidden: EffectSet,
    pub remove: Option<EffectId>,
    pub add: Option<EffectId>,
}

impl RuleClause {
    pub fn matches(&self, current: EffectSet) -> bool {
        current.is_superset_of(self.required) && current.is_disjoint_from(self.forbidden)
    }

    /// Apply this clause to an effect set. Callers check [`matches`] first.
    ///
    /// [`matches`]: RuleClause::matches
    pub fn apply(&self, current: EffectSet) -> EffectSet {
        let mut next = current;
        if let Some(id) = self.remove {
            next.remove(id);
        }
        if let Some(id) = self.add {
            next.insert(id);
        }
        next
    }
}
