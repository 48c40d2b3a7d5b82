//! Error taxonomy for catalog access and unmix requests.
//!
//! `NotFound` and `Cancelled` are *outcomes* of a search, not errors; they
//! live on [`crate::search::UnmixOutcome`]. Everything here is a genuine
//! caller fault or load failure, surfaced immediately and never retried.

use crate::effect::MAX_EFFECTS;
use thiserror::Error;

/// A reference or document the catalog cannot resolve.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown base product '{0}'")]
    UnknownBaseProduct(String),

    #[error("unknown additive '{0}'")]
    UnknownAdditive(String),

    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    #[error("catalog defines {0} effects; at most {MAX_EFFECTS} are supported")]
    TooManyEffects(usize),

    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An unmix request the search refuses to run.
#[derive(Debug, Error)]
pub enum UnmixError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no target effects requested")]
    EmptyTarget,

    #[error("{requested} target effects requested; the cap is {cap}")]
    TargetTooLarge { requested: usize, cap: usize },
}
