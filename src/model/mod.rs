//! Data model for rooted, branch-length-weighted phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes referenced by [TreeIndex]. Vertices carry an ordered list
//! of children (trees are not required to be binary), an optional
//! non-negative [BranchLength] to their parent, and a structured
//! [NodeLabel](crate::taxonomy::NodeLabel).
//!
//! Structural mutation is part of the model: [Tree::insert_above] splices a
//! new vertex onto the branch between a vertex and its parent, and
//! [Tree::splice_unary_vertices] removes every vertex with exactly one
//! child while preserving root-to-leaf path lengths. Spliced vertices stay
//! in the arena but are detached; all counting and traversal operations are
//! defined over vertices reachable from the root.

pub mod tree;
pub mod vertex;

pub use tree::FindError;
pub use tree::Tree;
pub use tree::TreeIndex;
pub use vertex::BranchLength;
pub use vertex::Vertex;
