//! Canonical effect identifiers and effect sets.
//!
//! Effect names are interned by the catalog into dense `EffectId` indices so
//! that a whole effect set fits in one machine word. The bitset encoding is
//! what the unmix search keys its deduplication map on, so equality and
//! hashing must be canonical: same effects, same bits, regardless of the
//! order they were added in.

use std::fmt;

/// Maximum number of distinct effects a catalog may define.
pub const MAX_EFFECTS: usize = 64;

/// Interned index of an effect in the catalog's effect table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(u16);

impl EffectId {
    /// Create an id from a table index. Callers must keep the index below
    /// [`MAX_EFFECTS`]; the catalog builder enforces this at load time.
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < MAX_EFFECTS);
        EffectId(index as u16)
    }

    /// Index into the catalog's effect table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A set of effects encoded as a 64-bit mask over [`EffectId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EffectSet(u64);

impl EffectSet {
    /// The empty set.
    pub const EMPTY: EffectSet = EffectSet(0);

    /// Set containing a single effect.
    pub fn single(id: EffectId) -> Self {
        EffectSet(1u64 << id.0)
    }

    /// Add an effect. Idempotent.
    pub fn insert(&mut self, id: EffectId) {
        self.0 |= 1u64 << id.0;
    }

    /// Remove an effect. No-op if absent.
    pub fn remove(&mut self, id: EffectId) {
        self.0 &= !(1u64 << id.0);
    }

    /// Copy of this set with `id` added.
    pub fn with(self, id: EffectId) -> Self {
        EffectSet(self.0 | (1u64 << id.0))
    }

    /// Copy of this set with `id` removed.
    pub fn without(self, id: EffectId) -> Self {
        EffectSet(self.0 & !(1u64 << id.0))
    }

    pub fn contains(self, id: EffectId) -> bool {
        self.0 & (1u64 << id.0) != 0
    }

    /// True if every effect in `other` is also in `self`.
    pub fn is_superset_of(self, other: EffectSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no effect is shared with `other`.
    pub fn is_disjoint_from(self, other: EffectSet) -> bool {
        self.0 & other.0 == 0
    }

    pub fn union(self, other: EffectSet) -> EffectSet {
        EffectSet(self.0 | other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits; the canonical dedup key for search states.
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Iterate contained effects in id order.
    pub fn iter(self) -> impl Iterator<Item = EffectId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                None
            } else {
                let index = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(EffectId::new(index))
            }
        })
    }
}

impl FromIterator<EffectId> for EffectSet {
    fn from_iter<I: IntoIterator<Item = EffectId>>(iter: I) -> Self {
        let mut set = EffectSet::EMPTY;
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl fmt::Display for EffectSet {
    /// Debug-oriented rendering by id; name rendering lives on the catalog.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.iter().map(|id| id.index().to_string()).collect();
        write!(f, "{{{}}}", ids.join(", "))
    }
}
