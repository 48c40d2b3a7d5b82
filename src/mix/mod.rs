//! Mixing engine: the deterministic transition function from a base product
//! and an ordered additive sequence to a trace of effect sets.
//!
//! Rule tables are data, not code: one generic interpreter walks each
//! additive's clause list in priority order and fires the first clause whose
//! preconditions hold. Applying an additive is a pure function of the current
//! effect set and the additive's static rules, so a whole mix is safe to
//! memoize by (base, additive sequence).

use crate::catalog::{Additive, AdditiveId, BaseId, Catalog};
use crate::effect::EffectSet;
use crate::error::CatalogError;

/// One step of a mix: the additive applied and the effect set after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixStep {
    pub additive: AdditiveId,
    pub effects: EffectSet,
}

/// Ordered trace of a mix. Its length always equals the number of additives
/// applied; a no-op application still records a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixPath {
    pub base: BaseId,
    /// The base product's intrinsic effects before any additive.
    pub start: EffectSet,
    pub steps: Vec<MixStep>,
}

impl MixPath {
    /// The authoritative final effect set.
    pub fn final_effects(&self) -> EffectSet {
        self.steps.last().map_or(self.start, |step| step.effects)
    }

    pub fn additives(&self) -> impl Iterator<Item = AdditiveId> + '_ {
        self.steps.iter().map(|step| step.additive)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Apply one additive to an effect set: first matching clause fires, no
/// matching clause means a no-op.
pub fn apply_additive(additive: &Additive, current: EffectSet) -> EffectSet {
    match additive.rules.iter().find(|clause| clause.matches(current)) {
        Some(clause) => clause.apply(current),
        None => current,
    }
}

/// Mix by pre-resolved ids. Infallible: ids are only issued by `catalog`.
pub fn mix_ids(catalog: &Catalog, base: BaseId, additives: &[AdditiveId]) -> MixPath {
    let start = catalog.base(base).effects;
    let mut current = start;
    let mut steps = Vec::with_capacity(additives.len());
    for &id in additives {
        current = apply_additive(catalog.additive(id), current);
        steps.push(MixStep {
            additive: id,
            effects: current,
        });
    }
    MixPath { base, start, steps }
}

/// Mix by name. Unknown base or additive names surface immediately as
/// [`CatalogError`]; nothing is silently skipped.
pub fn mix<S: AsRef<str>>(
    catalog: &Catalog,
    base: &str,
    additives: &[S],
) -> Result<MixPath, CatalogError> {
    let base = catalog.base_id(base)?;
    let additives = additives
        .iter()
        .map(|name| catalog.additive_id(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(mix_ids(catalog, base, &additives))
}
