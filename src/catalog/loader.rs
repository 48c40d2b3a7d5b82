//! JSON catalog document and its conversion into a validated [`Catalog`].
//!
//! The document is one object with four sections: the rank ladder, the
//! effect table, base products, and additives with their rule clauses.
//! Maps are ordered (`BTreeMap`) so id assignment, and therefore search
//! tie-breaking, is deterministic for a given document.

use crate::catalog::{Catalog, CatalogBuilder, Money};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One rule clause as written in a catalog document.
///
/// All fields are optional; an empty clause matches any state and does
/// nothing, which is never useful but not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClauseDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<String>,
}

impl ClauseDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requires(mut self, effect: &str) -> Self {
        self.required.push(effect.to_string());
        self
    }

    pub fn forbids(mut self, effect: &str) -> Self {
        self.forbidden.push(effect.to_string());
        self
    }

    pub fn removes(mut self, effect: &str) -> Self {
        self.remove = Some(effect.to_string());
        self
    }

    pub fn adds(mut self, effect: &str) -> Self {
        self.add = Some(effect.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct EffectDef {
    #[serde(default)]
    multiplier: f64,
}

#[derive(Debug, Deserialize)]
struct ProductDef {
    cost: Money,
    sell_value: Money,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    effects: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AdditiveDoc {
    cost: Money,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    rules: Vec<ClauseDef>,
}

#[derive(Debug, Deserialize)]
struct CatalogDoc {
    #[serde(default)]
    ranks: Vec<String>,
    effects: BTreeMap<String, EffectDef>,
    products: BTreeMap<String, ProductDef>,
    additives: BTreeMap<String, AdditiveDoc>,
}

pub(crate) fn from_json_str(json: &str) -> Result<Catalog, CatalogError> {
    let doc: CatalogDoc = serde_json::from_str(json)?;
    let mut builder = CatalogBuilder::default().ranks(doc.ranks);

    for (name, def) in &doc.effects {
        builder = builder.effect(name, def.multiplier);
    }
    for (name, def) in &doc.products {
        let effects: Vec<&str> = def.effects.iter().map(String::as_str).collect();
        builder = builder.base(name, def.cost, def.sell_value, def.rank.as_deref(), &effects);
    }
    for (name, def) in &doc.additives {
        builder = builder.additive(name, def.cost, def.rank.as_deref(), def.rules.clone());
    }

    let catalog = builder.build()?;
    debug!(
        effects = doc.effects.len(),
        products = doc.products.len(),
        additives = doc.additives.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

pub(crate) fn from_path(path: &Path) -> Result<Catalog, CatalogError> {
    let json = fs::read_to_string(path)?;
    from_json_str(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::RankFilter;

    const DOC: &str = r#"{
        "ranks": ["Novice", "Dealer"],
        "effects": {
            "Bright": { "multiplier": 0.2 },
            "Fast": { "multiplier": 0.3 }
        },
        "products": {
            "Plain": { "cost": 1.0, "sell_value": 35.0, "effects": [] },
            "Premium": {
                "cost": 4.0,
                "sell_value": 70.0,
                "rank": "Dealer",
                "effects": ["Bright"]
            }
        },
        "additives": {
            "Spark": {
                "cost": 2.0,
                "rules": [ { "forbidden": ["Bright"], "add": "Bright" } ]
            },
            "Surge": {
                "cost": 5.0,
                "rank": "Dealer",
                "rules": [
                    { "forbidden": ["Bright"], "add": "Bright" },
                    { "required": ["Bright"], "add": "Fast" }
                ]
            }
        }
    }"#;

    #[test]
    fn test_load_valid_document() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        assert_eq!(catalog.ranks().len(), 2);
        assert_eq!(catalog.effects().count(), 2);
        assert_eq!(catalog.bases().count(), 2);
        assert_eq!(catalog.additives().count(), 2);

        let spark = catalog.additive(catalog.additive_id("Spark").unwrap());
        assert_eq!(spark.cost, Money::from_cents(200));
        assert_eq!(spark.rules.len(), 1);

        let surge = catalog.additive(catalog.additive_id("Surge").unwrap());
        assert_eq!(surge.rules.len(), 2);
    }

    #[test]
    fn test_ids_follow_document_order() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        // BTreeMap: alphabetical within each section
        assert_eq!(catalog.additive_id("Spark").unwrap().index(), 0);
        assert_eq!(catalog.additive_id("Surge").unwrap().index(), 1);
        assert_eq!(catalog.base_id("Plain").unwrap().index(), 0);
        assert_eq!(catalog.base_id("Premium").unwrap().index(), 1);
    }

    #[test]
    fn test_rank_gating_from_document() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let novice = catalog.unlocked_additives(RankFilter::AtRank(0));
        assert_eq!(novice.len(), 1);
        assert_eq!(catalog.additive(novice[0]).name, "Spark");
    }

    #[test]
    fn test_unknown_effect_in_rules_rejected() {
        let doc = r#"{
            "effects": { "Bright": {} },
            "products": {},
            "additives": {
                "Bad": { "cost": 1.0, "rules": [ { "add": "Missing" } ] }
            }
        }"#;
        assert!(matches!(
            Catalog::from_json_str(doc),
            Err(CatalogError::UnknownEffect(_))
        ));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let doc = r#"{
            "effects": {},
            "products": {},
            "additives": { "Bad": { "cost": -2.0 } }
        }"#;
        assert!(matches!(
            Catalog::from_json_str(doc),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Catalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Catalog::from_path(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
