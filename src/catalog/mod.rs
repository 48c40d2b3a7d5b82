//! Immutable catalog of effects, base products, additives, and rule tables.
//!
//! Loaded once (from JSON or via [`CatalogBuilder`]), then shared read-only
//! across every engine invocation. Effect, base, and additive names are
//! interned into dense ids at build time; all engine-facing lookups are by
//! id, and name resolution is the boundary where unknown references surface
//! as typed errors.

pub mod loader;
pub mod types;

pub use loader::ClauseDef;
pub use types::{Additive, AdditiveId, BaseId, BaseProduct, Effect, Money, RuleClause};

use crate::effect::{EffectId, EffectSet, MAX_EFFECTS};
use crate::error::CatalogError;
use crate::rank::{RankFilter, Unlock};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Read-only game data shared by the mixing engine and the unmix search.
#[derive(Debug, Clone)]
pub struct Catalog {
    ranks: Vec<String>,
    effects: Vec<Effect>,
    effect_ids: HashMap<String, EffectId>,
    bases: Vec<BaseProduct>,
    base_ids: HashMap<String, BaseId>,
    additives: Vec<Additive>,
    additive_ids: HashMap<String, AdditiveId>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Parse and validate a catalog document.
    pub fn from_json_str(json: &str) -> Result<Catalog, CatalogError> {
        loader::from_json_str(json)
    }

    /// Read, parse, and validate a catalog file.
    pub fn from_path(path: &Path) -> Result<Catalog, CatalogError> {
        loader::from_path(path)
    }

    // --- name resolution ---

    pub fn effect_id(&self, name: &str) -> Result<EffectId, CatalogError> {
        self.effect_ids
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownEffect(name.to_string()))
    }

    pub fn base_id(&self, name: &str) -> Result<BaseId, CatalogError> {
        self.base_ids
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownBaseProduct(name.to_string()))
    }

    pub fn additive_id(&self, name: &str) -> Result<AdditiveId, CatalogError> {
        self.additive_ids
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownAdditive(name.to_string()))
    }

    /// Resolve a list of effect names into a canonical set.
    pub fn effect_set<S: AsRef<str>>(&self, names: &[S]) -> Result<EffectSet, CatalogError> {
        let mut set = EffectSet::EMPTY;
        for name in names {
            set.insert(self.effect_id(name.as_ref())?);
        }
        Ok(set)
    }

    // --- id access (ids are only issued by this catalog) ---

    pub fn effect(&self, id: EffectId) -> &Effect {
        &self.effects[id.index()]
    }

    pub fn base(&self, id: BaseId) -> &BaseProduct {
        &self.bases[id.index()]
    }

    pub fn additive(&self, id: AdditiveId) -> &Additive {
        &self.additives[id.index()]
    }

    pub fn effects(&self) -> impl Iterator<Item = (EffectId, &Effect)> {
        self.effects
            .iter()
            .enumerate()
            .map(|(i, e)| (EffectId::new(i), e))
    }

    pub fn bases(&self) -> impl Iterator<Item = (BaseId, &BaseProduct)> {
        self.bases
            .iter()
            .enumerate()
            .map(|(i, b)| (BaseId(i as u16), b))
    }

    pub fn additives(&self) -> impl Iterator<Item = (AdditiveId, &Additive)> {
        self.additives
            .iter()
            .enumerate()
            .map(|(i, a)| (AdditiveId(i as u16), a))
    }

    // --- ranks ---

    pub fn ranks(&self) -> &[String] {
        &self.ranks
    }

    pub fn rank_index(&self, name: &str) -> Option<u16> {
        self.ranks.iter().position(|r| r == name).map(|i| i as u16)
    }

    // --- candidate pools (selection-time rank gating; the engines do not
    //     re-check unlock status) ---

    pub fn unlocked_additives(&self, filter: RankFilter) -> Vec<AdditiveId> {
        self.additives()
            .filter(|(_, a)| filter.is_unlocked(a.unlock))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn unlocked_bases(&self, filter: RankFilter) -> Vec<BaseId> {
        self.bases()
            .filter(|(_, b)| filter.is_unlocked(b.unlock))
            .map(|(id, _)| id)
            .collect()
    }

    // --- rendering ---

    pub fn effect_names(&self, set: EffectSet) -> Vec<&str> {
        set.iter().map(|id| self.effect(id).name.as_str()).collect()
    }

    pub fn render_effects(&self, set: EffectSet) -> String {
        if set.is_empty() {
            "(none)".to_string()
        } else {
            self.effect_names(set).join(", ")
        }
    }
}

/// Programmatic catalog construction; the JSON loader drives this too.
///
/// Insertion order determines id order, which in turn fixes the deterministic
/// tie-breaking of the unmix search.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    ranks: Vec<String>,
    effects: Vec<(String, f64)>,
    bases: Vec<BaseDef>,
    additives: Vec<AdditiveDef>,
}

#[derive(Debug)]
struct BaseDef {
    name: String,
    cost: Money,
    sell_value: Money,
    rank: Option<String>,
    effects: Vec<String>,
}

#[derive(Debug)]
struct AdditiveDef {
    name: String,
    cost: Money,
    rank: Option<String>,
    rules: Vec<ClauseDef>,
}

impl CatalogBuilder {
    pub fn ranks<I, S>(mut self, ranks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ranks = ranks.into_iter().map(Into::into).collect();
        self
    }

    pub fn effect(mut self, name: &str, multiplier: f64) -> Self {
        self.effects.push((name.to_string(), multiplier));
        self
    }

    pub fn base(
        mut self,
        name: &str,
        cost: Money,
        sell_value: Money,
        rank: Option<&str>,
        effects: &[&str],
    ) -> Self {
        self.bases.push(BaseDef {
            name: name.to_string(),
            cost,
            sell_value,
            rank: rank.map(str::to_string),
            effects: effects.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn additive(
        mut self,
        name: &str,
        cost: Money,
        rank: Option<&str>,
        rules: Vec<ClauseDef>,
    ) -> Self {
        self.additives.push(AdditiveDef {
            name: name.to_string(),
            cost,
            rank: rank.map(str::to_string),
            rules,
        });
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.effects.len() > MAX_EFFECTS {
            return Err(CatalogError::TooManyEffects(self.effects.len()));
        }

        let mut effects = Vec::with_capacity(self.effects.len());
        let mut effect_ids = HashMap::new();
        for (index, (name, multiplier)) in self.effects.into_iter().enumerate() {
            if effect_ids
                .insert(name.clone(), EffectId::new(index))
                .is_some()
            {
                return Err(CatalogError::DuplicateName {
                    kind: "effect",
                    name,
                });
            }
            effects.push(Effect { name, multiplier });
        }

        let mut catalog = Catalog {
            ranks: self.ranks,
            effects,
            effect_ids,
            bases: Vec::new(),
            base_ids: HashMap::new(),
            additives: Vec::new(),
            additive_ids: HashMap::new(),
        };

        for def in self.bases {
            let unlock = resolve_unlock(&catalog, &def.name, def.rank.as_deref());
            let effects = catalog.effect_set(&def.effects)?;
            let id = BaseId(catalog.bases.len() as u16);
            if catalog.base_ids.insert(def.name.clone(), id).is_some() {
                return Err(CatalogError::DuplicateName {
                    kind: "base product",
                    name: def.name,
                });
            }
            catalog.bases.push(BaseProduct {
                name: def.name,
                cost: def.cost,
                sell_value: def.sell_value,
                unlock,
                effects,
            });
        }

        for def in self.additives {
            let unlock = resolve_unlock(&catalog, &def.name, def.rank.as_deref());
            let rules = def
                .rules
                .iter()
                .map(|clause| resolve_clause(&catalog, clause))
                .collect::<Result<Vec<_>, _>>()?;
            let id = AdditiveId(catalog.additives.len() as u16);
            if catalog.additive_ids.insert(def.name.clone(), id).is_some() {
                return Err(CatalogError::DuplicateName {
                    kind: "additive",
                    name: def.name,
                });
            }
            catalog.additives.push(Additive {
                name: def.name,
                cost: def.cost,
                unlock,
                rules,
            });
        }

        Ok(catalog)
    }
}

fn resolve_unlock(catalog: &Catalog, item: &str, rank: Option<&str>) -> Unlock {
    match rank {
        None => Unlock::Always,
        Some(name) => match catalog.rank_index(name) {
            Some(index) => Unlock::AtRank(index),
            None => {
                warn!(item, rank = name, "rank not on ladder; item never unlocks");
                Unlock::Never
            }
        },
    }
}

fn resolve_clause(catalog: &Catalog, clause: &ClauseDef) -> Result<RuleClause, CatalogError> {
    Ok(RuleClause {
        required: catalog.effect_set(&clause.required)?,
        forbidden: catalog.effect_set(&clause.forbidden)?,
        remove: clause
            .remove
            .as_deref()
            .map(|name| catalog.effect_id(name))
            .transpose()?,
        add: clause
            .add
            .as_deref()
            .map(|name| catalog.effect_id(name))
            .transpose()?,
    })
}
