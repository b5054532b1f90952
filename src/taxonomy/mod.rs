//! Taxonomic ranks and node labels.
//!
//! # Ranks
//! [Rank] models the fixed, totally ordered taxonomic hierarchy
//! (domain < phylum < ... < species < strain). Each rank has a short
//! prefix token (`D__`, `P__`, ...) used when labels are serialized.
//!
//! # Node labels
//! [NodeLabel] is the structured form of everything a node name can carry:
//! an optional bootstrap support value, an optional taxon text, and an
//! ordered run of assigned ranks. The textual multiplexed form
//! (`support:taxon|D__;P__`) only exists at the Newick boundary; the
//! marking algorithm works on the structured type directly.

pub mod label;
pub mod rank;

pub use label::NodeLabel;
pub use rank::Rank;
