//! Gene family identifiers and the per-tree dense id dictionary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque gene-family token.
///
/// Equality and total order are those of the underlying string; the token
/// carries no further structure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gene(String);

impl Gene {
    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Gene {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for Gene {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Dense gene-id dictionary for one tree.
///
/// The unordered engine works on bit sets, so gene families observed in a
/// tree are assigned consecutive small ids. Ids follow the lexicographic
/// order of the tokens, which makes every derived per-set element order
/// stable across runs.
#[derive(Debug, Clone, Default)]
pub struct GeneDict {
    genes: Vec<Gene>,
    index: BTreeMap<Gene, usize>,
}

impl GeneDict {
    /// Build a dictionary from an iterator of genes, deduplicating and
    /// sorting tokens.
    pub fn from_genes<'a>(genes: impl IntoIterator<Item = &'a Gene>) -> Self {
        let sorted: BTreeMap<Gene, ()> =
            genes.into_iter().map(|gene| (gene.clone(), ())).collect();
        let genes: Vec<Gene> = sorted.into_keys().collect();
        let index = genes
            .iter()
            .enumerate()
            .map(|(id, gene)| (gene.clone(), id))
            .collect();
        Self { genes, index }
    }

    /// Number of distinct gene families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// True when no gene has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Dense id of a gene, if known.
    #[must_use]
    pub fn id(&self, gene: &Gene) -> Option<usize> {
        self.index.get(gene).copied()
    }

    /// Gene for a dense id.
    ///
    /// # Panics
    ///
    /// Panics when `id` was never issued by this dictionary.
    #[must_use]
    pub fn gene(&self, id: usize) -> &Gene {
        &self.genes[id]
    }
}
