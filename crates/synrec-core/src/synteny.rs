//! Ordered blocks of gene families and the segmental-loss algebra on them.
//!
//! A [`Synteny`] is an ordered sequence of [`Gene`] tokens (duplicates
//! permitted; the sequence is the identity). The operations here are the
//! primitives both reconciliation engines are built from:
//!
//! - enumeration of all `2^n` ordered subsequences,
//! - the segmental-loss distance between a synteny and a subsequence of it,
//! - reconciliation, which reports the lost segments explicitly.
//!
//! Loss counting has two modes. *Total* mode counts every maximal run of
//! unmatched positions. *Substring* mode ignores runs that abut the start
//! or the end of the source, which is the right cost model when the target
//! is a segmental copy and may therefore be a middle fragment.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::gene::Gene;

/// A half-open interval `[start, end)` of positions within a synteny.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// First covered position.
    pub start: usize,
    /// One past the last covered position.
    pub end: usize,
}

impl Segment {
    /// The distinguished "not applicable" value, `[0, 0)`.
    pub const NONE: Self = Self { start: 0, end: 0 };

    /// Construct a segment.
    ///
    /// # Panics
    ///
    /// Panics when `start > end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "segment start {start} exceeds end {end}");
        Self { start, end }
    }

    /// Number of covered positions.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True for zero-length segments, including [`Segment::NONE`].
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Errors from the synteny algebra.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntenyError {
    /// The target cannot be obtained from the source by deleting positions.
    #[error("'{target}' is not a subsequence of '{source_seq}'")]
    NotASubsequence {
        /// The source sequence.
        source_seq: String,
        /// The offending target sequence.
        target: String,
    },
}

/// An ordered sequence of gene families.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Synteny(Vec<Gene>);

impl Synteny {
    /// The empty synteny.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of gene positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no position is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The genes in order.
    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.0
    }

    /// Iterate over all `2^n` ordered subsequences, each a fresh owned
    /// value, in ascending bitmask order (bit `i` set = keep position `i`).
    /// The empty subsequence comes first and the full sequence last.
    #[must_use]
    pub fn subsequences(&self) -> Subsequences<'_> {
        assert!(
            self.len() < u64::BITS as usize,
            "subsequence enumeration is limited to {} positions",
            u64::BITS - 1
        );
        Subsequences {
            source: self,
            next: 0,
            stop: 1_u64 << self.len(),
        }
    }

    /// The subsequence selected by `mask` (bit `i` = keep position `i`).
    #[must_use]
    pub fn subsequence(&self, mask: u64) -> Self {
        let genes = self
            .0
            .iter()
            .enumerate()
            .filter(|(position, _)| mask & (1 << position) != 0)
            .map(|(_, gene)| gene.clone())
            .collect();
        Self(genes)
    }

    /// The contiguous slice covered by `segment`.
    ///
    /// # Panics
    ///
    /// Panics when `segment` is out of bounds.
    #[must_use]
    pub fn slice(&self, segment: Segment) -> Self {
        Self(self.0[segment.start..segment.end].to_vec())
    }

    /// The synteny with the positions of `segment` deleted.
    ///
    /// # Panics
    ///
    /// Panics when `segment` is out of bounds.
    #[must_use]
    pub fn remove_segment(&self, segment: Segment) -> Self {
        let mut genes = Vec::with_capacity(self.len() - segment.len());
        genes.extend_from_slice(&self.0[..segment.start]);
        genes.extend_from_slice(&self.0[segment.end..]);
        Self(genes)
    }

    /// Every maximal run of source positions left unmatched by the greedy
    /// lock-step embedding of `target` into `self`, in source coordinates.
    ///
    /// This is the primitive behind both counting modes: total mode counts
    /// all runs, substring mode drops runs abutting either end.
    fn lost_runs(&self, target: &Self) -> Result<Vec<Segment>, SyntenyError> {
        let mut runs = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut matched = 0_usize;

        for (position, gene) in self.0.iter().enumerate() {
            if matched < target.len() && *gene == target.0[matched] {
                if let Some(start) = run_start.take() {
                    runs.push(Segment::new(start, position));
                }
                matched += 1;
            } else if run_start.is_none() {
                run_start = Some(position);
            }
        }

        if matched < target.len() {
            return Err(SyntenyError::NotASubsequence {
                source_seq: self.to_string(),
                target: target.to_string(),
            });
        }
        if let Some(start) = run_start {
            runs.push(Segment::new(start, self.len()));
        }
        Ok(runs)
    }

    /// Both loss counts — `(total, substring)` — in a single walk.
    ///
    /// # Errors
    ///
    /// [`SyntenyError::NotASubsequence`] when `target` is not a
    /// subsequence of `self`.
    pub fn loss_counts(&self, target: &Self) -> Result<(usize, usize), SyntenyError> {
        let runs = self.lost_runs(target)?;
        let total = runs.len();
        let inner = runs
            .iter()
            .filter(|run| run.start != 0 && run.end != self.len())
            .count();
        Ok((total, inner))
    }

    /// The number of segmental losses needed to turn `self` into `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use synrec_core::synteny::Synteny;
    ///
    /// let source: Synteny = "1 2 3 4 5 6 7 8 9".parse().unwrap();
    /// let target: Synteny = "1 4 5 6".parse().unwrap();
    /// // Total mode counts "2 3" and "7 8 9".
    /// assert_eq!(source.loss_distance(&target, false), Ok(2));
    /// // Substring mode waives the trailing "7 8 9".
    /// assert_eq!(source.loss_distance(&target, true), Ok(1));
    /// ```
    ///
    /// # Errors
    ///
    /// [`SyntenyError::NotASubsequence`] when `target` is not a
    /// subsequence of `self`.
    pub fn loss_distance(&self, target: &Self, substring: bool) -> Result<usize, SyntenyError> {
        let (total, inner) = self.loss_counts(target)?;
        Ok(if substring { inner } else { total })
    }

    /// The explicit lost segments (source coordinates), truncated to at
    /// most `bound` entries. In substring mode, runs abutting the start or
    /// end of the source are omitted before truncation, matching
    /// [`Synteny::loss_distance`].
    ///
    /// # Examples
    ///
    /// ```
    /// use synrec_core::cost::Cost;
    /// use synrec_core::synteny::{Segment, Synteny};
    ///
    /// let source: Synteny = "a b c d".parse().unwrap();
    /// let target: Synteny = "a d".parse().unwrap();
    /// let segments = source.reconcile(&target, false, Cost::PosInf).unwrap();
    /// assert_eq!(segments, vec![Segment::new(1, 3)]);
    /// ```
    ///
    /// # Errors
    ///
    /// [`SyntenyError::NotASubsequence`] when `target` is not a
    /// subsequence of `self`.
    pub fn reconcile(
        &self,
        target: &Self,
        substring: bool,
        bound: Cost,
    ) -> Result<Vec<Segment>, SyntenyError> {
        let mut runs = self.lost_runs(target)?;
        if substring {
            runs.retain(|run| run.start != 0 && run.end != self.len());
        }
        let limit = match bound {
            Cost::PosInf => usize::MAX,
            Cost::Finite(value) => usize::try_from(value).unwrap_or(0),
            Cost::NegInf => 0,
        };
        runs.truncate(limit);
        Ok(runs)
    }
}

impl fmt::Display for Synteny {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, gene) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{gene}")?;
        }
        Ok(())
    }
}

impl FromStr for Synteny {
    type Err = std::convert::Infallible;

    /// Parse a whitespace-separated gene list; empty input is the empty
    /// synteny.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(text.split_whitespace().map(Gene::from).collect())
    }
}

impl FromIterator<Gene> for Synteny {
    fn from_iter<I: IntoIterator<Item = Gene>>(genes: I) -> Self {
        Self(genes.into_iter().collect())
    }
}

impl From<Vec<Gene>> for Synteny {
    fn from(genes: Vec<Gene>) -> Self {
        Self(genes)
    }
}

impl Serialize for Synteny {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Synteny {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_str(&text).map_err(de::Error::custom)
    }
}

/// Iterator over all ordered subsequences of a synteny.
#[derive(Debug)]
pub struct Subsequences<'a> {
    source: &'a Synteny,
    next: u64,
    stop: u64,
}

impl Iterator for Subsequences<'_> {
    type Item = Synteny;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.stop {
            return None;
        }
        let mask = self.next;
        self.next += 1;
        Some(self.source.subsequence(mask))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.stop - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Subsequences<'_> {}
