//! Vertex type for the arena-based tree representation.

use std::ops::Deref;

use crate::model::tree::TreeIndex;
use crate::taxonomy::NodeLabel;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// A vertex (node) in a phylogenetic tree.
///
/// Vertices live in the tree's arena and reference each other by
/// [TreeIndex] only. A vertex with no children is a leaf (tip); the root is
/// the single vertex with no parent that the tree's root index points to.
///
/// # Invariants
/// - `index` is this vertex's position in the arena
/// - `branch_length` is non-negative if present (enforced by [BranchLength])
/// - `children` is ordered; traversal follows this order deterministically
/// - `parent` is `None` for the root and for vertices under construction
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    index: TreeIndex,
    parent: Option<TreeIndex>,
    children: Vec<TreeIndex>,
    branch_length: Option<BranchLength>,
    label: NodeLabel,
}

impl Vertex {
    /// Creates a new vertex; parent is attached by the tree.
    pub(crate) fn new(
        index: TreeIndex,
        children: Vec<TreeIndex>,
        branch_length: Option<BranchLength>,
        label: NodeLabel,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children,
            branch_length,
            label,
        }
    }

    /// Returns the index of this vertex in the arena.
    pub fn index(&self) -> TreeIndex {
        self.index
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<TreeIndex> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<TreeIndex>) {
        self.parent = parent;
    }

    /// Returns the ordered child indices; empty for a leaf.
    pub fn children(&self) -> &[TreeIndex] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<TreeIndex> {
        &mut self.children
    }

    /// Returns `true` if this vertex is a leaf (tip), recognized
    /// structurally by having no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the branch length to the parent, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns the branch length as an `f64`, treating an absent length as 0.
    pub fn branch_length_or_zero(&self) -> f64 {
        self.branch_length.map(|bl| *bl).unwrap_or(0.0)
    }

    /// Sets the branch length to the parent.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    /// Returns the label of this vertex.
    pub fn label(&self) -> &NodeLabel {
        &self.label
    }

    /// Returns a mutable reference to the label of this vertex.
    pub fn label_mut(&mut self) -> &mut NodeLabel {
        &mut self.label
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(
            length >= 0.0,
            "Branch length must be non-negative, got {}",
            length
        );
        assert!(
            length.is_finite(),
            "Branch length must be finite, got {}",
            length
        );
        BranchLength(length)
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}
