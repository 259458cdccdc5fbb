//! The candidate space of the ordered DP.
//!
//! Candidates are the ordered subsequences of the ancestral synteny,
//! addressed by bitmask: bit `i` set means position `i` of the root is
//! kept. With that addressing, the candidates available *below* a
//! candidate `X` are exactly the submasks of `X`, enumerable without
//! touching the sequences at all.

use synrec_core::synteny::Synteny;

/// All `2^n` candidate syntenies for one root, indexed by mask.
pub(crate) struct CandidateSet {
    sequences: Vec<Synteny>,
}

impl CandidateSet {
    /// Materialize the candidate space of `root`.
    pub(crate) fn enumerate(root: &Synteny) -> Self {
        Self {
            sequences: root.subsequences().collect(),
        }
    }

    /// Number of candidates (`2^n`).
    pub(crate) fn len(&self) -> usize {
        self.sequences.len()
    }

    /// The mask selecting the whole root synteny.
    pub(crate) fn full_mask(&self) -> usize {
        self.sequences.len() - 1
    }

    /// The candidate synteny for `mask`.
    pub(crate) fn sequence(&self, mask: usize) -> &Synteny {
        &self.sequences[mask]
    }

    /// Every submask of `mask`, descending from `mask` itself down to the
    /// empty candidate.
    pub(crate) fn submasks(mask: usize) -> Submasks {
        Submasks {
            mask,
            next: Some(mask),
        }
    }
}

/// Descending submask walk: `m, (m-1)&m, ..., 0`.
pub(crate) struct Submasks {
    mask: usize,
    next: Option<usize>,
}

impl Iterator for Submasks {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = if current == 0 {
            None
        } else {
            Some((current - 1) & self.mask)
        };
        Some(current)
    }
}
