//! Dense sets of gene-family ids.
//!
//! The unordered engine spends its time in set algebra over small
//! universes (the gene families observed in one tree), so sets are fixed
//! -width bit sets over the ids issued by a
//! [`synrec_core::gene::GeneDict`]. Piece extractions return ids in
//! ascending order, which is the element order used for every resolved
//! synteny.

use fixedbitset::FixedBitSet;

use synrec_core::gene::GeneDict;
use synrec_core::synteny::Synteny;

/// A set of gene-family ids over a fixed universe width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneSet {
    bits: FixedBitSet,
}

impl GeneSet {
    /// The empty set over a universe of `width` ids.
    #[must_use]
    pub fn with_width(width: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(width),
        }
    }

    /// The set of families occurring in `synteny`, resolved through
    /// `dict`. Families absent from the dictionary are ignored.
    #[must_use]
    pub fn from_synteny(synteny: &Synteny, dict: &GeneDict) -> Self {
        let mut set = Self::with_width(dict.len());
        for gene in synteny.genes() {
            if let Some(id) = dict.id(gene) {
                set.bits.insert(id);
            }
        }
        set
    }

    /// Number of families in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// True when no family is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge `other` into `self`.
    pub fn union_with(&mut self, other: &Self) {
        self.bits.union_with(&other.bits);
    }

    /// The union of both sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.union_with(other);
        merged
    }

    /// Ids present in both sets, ascending.
    #[must_use]
    pub fn shared_ids(&self, other: &Self) -> Vec<usize> {
        self.bits.intersection(&other.bits).collect()
    }

    /// Ids present in `self` but not in `other`, ascending.
    #[must_use]
    pub fn exclusive_ids(&self, other: &Self) -> Vec<usize> {
        self.bits.difference(&other.bits).collect()
    }

    /// True when every id of `other` is also in `self`.
    #[must_use]
    pub fn contains_all(&self, other: &Self) -> bool {
        other.bits.is_subset(&self.bits)
    }
}
