#![forbid(unsafe_code)]
//! Super-reconciliation engines for synteny family trees.
//!
//! Two complementary engines infer the most parsimonious evolutionary
//! history of a synteny family over a binary event tree:
//!
//! - [`ordered::reconcile_ordered`] — dynamic programming over ordered
//!   subsequences of a given ancestral synteny;
//! - [`unordered::reconcile_unordered`] — a three-pass set algorithm for
//!   when gene order is unknown (the ancestral content is inferred).
//!
//! Both mutate the tree in place, reify inferred losses as explicit loss
//! nodes, and minimize the duplication-loss objective of
//! [`score::dl_score`]. Inside a single call execution is single-threaded
//! and silent; failures surface as [`error::ReconcileError`].

pub mod error;
pub mod gene_set;
pub mod ordered;
pub mod score;
pub mod unordered;

pub use error::ReconcileError;
pub use gene_set::GeneSet;
pub use ordered::reconcile_ordered;
pub use score::{EventCounts, dl_score};
pub use unordered::reconcile_unordered;
