//! Taxmark predicts taxonomic ranks for the internal nodes of phylogenetic
//! trees.
//!
//! Given a rooted, branch-length-weighted tree and a set of anchor nodes
//! whose taxonomic rank is known, the crate propagates predicted ranks
//! (domain through genus) from the anchors toward the leaves, placing each
//! rank boundary by the average branch-length distance to the leaves below.
//! Core functionality provided:
//! - Newick: parse a single Newick tree (n-ary, named internal nodes,
//!   quoted labels, comments) and write it back out.
//! - Tree model: arena-based [Tree](model::Tree) with index handles,
//!   structural mutation (vertex insertion/splicing), and stack-based
//!   traversal iterators. See [crate::model] for details.
//! - Rank marking: [RankMarker](marker::RankMarker) with configurable
//!   support threshold; fails fast on unresolvable anchors, pre-labeled
//!   vertices, and broken propagation invariants.
//! - Consistency audit: independent root-to-tip monotonicity check of the
//!   placed rank runs, returned as a report rather than an error.
//!
//! Limitations:
//! - Single tree per file; no Nexus support
//! - Tree topology and branch lengths are inputs, never inferred
//!
//! # Usage patterns
//! 1. Quick access functions with default settings, below.
//! 2. Configure the pieces yourself via
//!    [NewickParser](newick::NewickParser) and
//!    [RankMarker](marker::RankMarker).
//!
//! ## Example
//! ```
//! use taxmark::marker::RankMarker;
//! use taxmark::taxonomy::Rank;
//!
//! let tree = taxmark::parse_newick_str("((a:5,b:5)t1:1,(c:1,d:1)t2:5)root;").unwrap();
//! let (tree, report) = RankMarker::new()
//!     .with_min_support(0.0)
//!     .mark(tree, &["root"], Rank::Domain)
//!     .unwrap();
//!
//! assert!(report.is_consistent());
//! println!("{}", tree.to_newick());
//! ```

pub mod marker;
pub mod model;
pub mod newick;
pub mod parser;
pub mod taxonomy;

use thiserror::Error;

use crate::marker::{ConsistencyReport, MarkError, RankMarker};
use crate::model::Tree;
use crate::parser::ParsingError;
use crate::taxonomy::Rank;

/// Crate-level error for the quick API, wrapping the stage-specific errors.
#[derive(Debug, Error)]
pub enum TaxmarkError {
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    #[error(transparent)]
    Mark(#[from] MarkError),
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a Newick string using default settings.
///
/// See [`newick::parse_str`] for full documentation of this convenience
/// function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick.as_ref())
}

// ============================================================================
// Quick marking API
// ============================================================================
/// Parses a Newick string and marks it with predicted taxonomic ranks using
/// default settings (no support threshold).
///
/// See [`marker::RankMarker::mark`] for full documentation.
pub fn mark_newick_str<S: AsRef<str>>(
    newick: S,
    anchors: &[&str],
    start_rank: Rank,
) -> Result<(Tree, ConsistencyReport), TaxmarkError> {
    let tree = newick::parse_str(newick.as_ref())?;
    let marked = RankMarker::new().mark(tree, anchors, start_rank)?;
    Ok(marked)
}
