//! Arena-based tree structure for rooted phylogenetic trees.
//!
//! Provides the core data structures for representing and mutating
//! phylogenetic trees:
//! - [Tree]: the main tree structure using the arena pattern
//! - [TreeIndex] is used to index vertices
//! - [FindError] for exact-name lookups

use thiserror::Error;

use crate::model::vertex::{BranchLength, Vertex};
use crate::newick;
use crate::taxonomy::NodeLabel;

/// Index of a vertex in a tree (arena).
pub type TreeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: TreeIndex = usize::MAX;

/// Error returned by exact-name vertex lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindError {
    /// No reachable vertex carries the requested taxon text.
    #[error("no vertex with taxon '{0}' found in tree")]
    NotFound(String),
    /// More than one reachable vertex carries the requested taxon text.
    #[error("taxon '{0}' is ambiguous: multiple vertices carry it")]
    Ambiguous(String),
}

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted phylogenetic tree represented using the arena pattern on
/// [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by [TreeIndex].
/// Aim is to avoid referencing troubles as well as to provide efficient
/// memory layout and cache locality for traversal operations.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena
/// - Index of root is maintained
/// - Children are ordered; arity is arbitrary (trees need not be binary)
/// - Branch lengths are optional, but if provided must be non-negative
/// - Splicing a vertex out ([Tree::splice_unary_vertices]) detaches it but
///   does not compact the arena; counting and traversal operations only
///   consider vertices reachable from the root
///
/// # Construction
/// To construct a tree, add vertices bottom-up: leaves first, then internal
/// vertices with their child indices, finally the root. Test validity with
/// [Tree::is_valid].
///
/// # Example
/// ```
/// use taxmark::model::{BranchLength, Tree};
/// use taxmark::taxonomy::NodeLabel;
///
/// // Create a tree: ((A:0.2,B:0.2):0.2,C:0.4);
/// let mut tree = Tree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(0.2)), NodeLabel::taxon("A"));
/// let b = tree.add_leaf(Some(BranchLength::new(0.2)), NodeLabel::taxon("B"));
/// let c = tree.add_leaf(Some(BranchLength::new(0.4)), NodeLabel::taxon("C"));
/// let inner = tree.add_internal_vertex(vec![a, b], Some(BranchLength::new(0.2)), NodeLabel::default());
/// tree.add_root(vec![inner, c], NodeLabel::default());
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.num_leaves(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: TreeIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new tree with capacity hinted by the expected number of
    /// leaves.
    ///
    /// # Arguments
    /// * `num_leaves` - expected number of leaves; must be positive
    pub fn new(num_leaves: usize) -> Self {
        assert!(num_leaves > 0);
        let capacity = 2 * num_leaves - 1;
        Tree {
            vertices: Vec::with_capacity(capacity),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets
    /// returned.
    ///
    /// # Arguments
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    /// * `label` - Label of this leaf
    pub fn add_leaf(&mut self, branch_length: Option<BranchLength>, label: NodeLabel) -> TreeIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new(index, Vec::new(), branch_length, label));
        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which
    /// gets returned. Sets itself as parent of all given children.
    ///
    /// # Arguments
    /// * `children` - Ordered child indices (must be non-empty)
    /// * `branch_length` - Length of incoming branch
    /// * `label` - Label of this vertex
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<TreeIndex>,
        branch_length: Option<BranchLength>,
        label: NodeLabel,
    ) -> TreeIndex {
        assert!(!children.is_empty());
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new(index, children.clone(), branch_length, label));

        for child in children {
            self.vertices[child].set_parent(Some(index));
        }

        index
    }

    /// Adds the root to the tree, assigning a unique index, which gets
    /// returned. Sets itself as parent of all given children.
    ///
    /// # Arguments
    /// * `children` - Ordered child indices (must be non-empty)
    /// * `label` - Label of the root
    pub fn add_root(&mut self, children: Vec<TreeIndex>, label: NodeLabel) -> TreeIndex {
        let index = self.add_internal_vertex(children, None, label);
        self.root_index = index;
        index
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus the tree hasn't been
    /// fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> TreeIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: TreeIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: TreeIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns the number of vertices reachable from the root.
    pub fn num_vertices(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of leaves reachable from the root.
    pub fn num_leaves(&self) -> usize {
        self.pre_order_iter().filter(|v| v.is_leaf()).count()
    }

    /// Returns the number of reachable internal vertices (non-leaf,
    /// non-root).
    pub fn num_internal(&self) -> usize {
        self.pre_order_iter()
            .filter(|v| !v.is_leaf() && v.index() != self.root_index)
            .count()
    }
}

impl std::ops::Index<TreeIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: TreeIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<TreeIndex> for Tree {
    fn index_mut(&mut self, index: TreeIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Traversal and distances (pub)
// ============================================================================
impl Tree {
    /// Returns an iterator over the reachable tree in pre-order (parents
    /// before children, children in stored order).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns the reachable vertex indices in pre-order as a snapshot.
    ///
    /// Useful for mutation passes that restructure the tree while walking
    /// it.
    pub fn pre_order_indices(&self) -> Vec<TreeIndex> {
        self.pre_order_iter().map(|v| v.index()).collect()
    }

    /// Returns an iterator over the ancestors of a vertex, nearest first,
    /// ending at the root.
    pub fn ancestor_indices(&self, index: TreeIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self[index].parent(),
        }
    }

    /// Returns the indices of all tips in the subtree rooted at `index`,
    /// in depth-first order following stored child order.
    ///
    /// A tip queried for itself yields just itself.
    pub fn tip_indices_under(&self, index: TreeIndex) -> Vec<TreeIndex> {
        let mut tips = Vec::new();
        let mut stack = vec![index];

        while let Some(current) = stack.pop() {
            let vertex = &self[current];
            if vertex.is_leaf() {
                tips.push(current);
            } else {
                // Push in reverse so stored order is visited first
                for &child in vertex.children().iter().rev() {
                    stack.push(child);
                }
            }
        }

        tips
    }

    /// Returns the cumulative branch-length distance from a descendant up
    /// to the given ancestor. Absent branch lengths count as 0.
    ///
    /// # Arguments
    /// * `descendant` - Vertex to start from
    /// * `ancestor` - Vertex to stop at (not included in the sum)
    ///
    /// # Panics
    /// Panics if `ancestor` is not an ancestor of `descendant`.
    pub fn distance_to_ancestor(&self, descendant: TreeIndex, ancestor: TreeIndex) -> f64 {
        let mut distance = 0.0;
        let mut current = descendant;

        while current != ancestor {
            distance += self[current].branch_length_or_zero();
            current = self[current]
                .parent()
                .unwrap_or_else(|| panic!("vertex {} is not below vertex {}", descendant, ancestor));
        }

        distance
    }

    /// Finds the single reachable vertex whose taxon text equals `taxon`.
    ///
    /// Support values and rank runs do not participate in the comparison.
    ///
    /// # Errors
    /// [FindError::NotFound] if no vertex matches,
    /// [FindError::Ambiguous] if more than one does.
    pub fn find_by_taxon(&self, taxon: &str) -> Result<TreeIndex, FindError> {
        let mut found = None;
        for vertex in self.pre_order_iter() {
            if vertex.label().taxon.as_deref() == Some(taxon) {
                if found.is_some() {
                    return Err(FindError::Ambiguous(taxon.to_string()));
                }
                found = Some(vertex.index());
            }
        }

        found.ok_or_else(|| FindError::NotFound(taxon.to_string()))
    }
}

// ============================================================================
// Structural mutation (pub)
// ============================================================================
impl Tree {
    /// Inserts a new vertex on the branch between `child` and its parent.
    ///
    /// The new vertex takes the child's slot in the parent's child order and
    /// sits at `dist_to_parent` below the parent; the child's branch length
    /// is reduced by the same amount, so the total path length through the
    /// branch is preserved.
    ///
    /// # Arguments
    /// * `child` - Vertex whose incoming branch gets split
    /// * `dist_to_parent` - Distance from the parent to the new vertex
    /// * `label` - Label of the new vertex
    ///
    /// # Returns
    /// The index of the newly created vertex.
    ///
    /// # Panics
    /// Panics if `child` is the root, or if `dist_to_parent` is negative or
    /// exceeds the child's branch length.
    pub fn insert_above(
        &mut self,
        child: TreeIndex,
        dist_to_parent: f64,
        label: NodeLabel,
    ) -> TreeIndex {
        let parent = self[child]
            .parent()
            .expect("cannot insert above the root");
        let child_length = self[child].branch_length_or_zero();

        let index = self.vertices.len();
        self.vertices.push(Vertex::new(
            index,
            vec![child],
            Some(BranchLength::new(dist_to_parent)),
            label,
        ));
        self.vertices[index].set_parent(Some(parent));

        let slot = self.child_slot(parent, child);
        self.vertices[parent].children_mut()[slot] = index;

        self.vertices[child].set_parent(Some(index));
        self.vertices[child]
            .set_branch_length(Some(BranchLength::new(child_length - dist_to_parent)));

        index
    }

    /// Splices out every reachable non-root vertex with exactly one child.
    ///
    /// The single child is reparented directly under the vertex's parent in
    /// the same slot, branch lengths are summed, so root-to-leaf path
    /// lengths are unchanged. Spliced vertices remain in the arena but are
    /// detached.
    pub fn splice_unary_vertices(&mut self) {
        // Snapshot, as the topology changes while we go
        let snapshot = self.pre_order_indices();

        for index in snapshot {
            if index == self.root_index || self[index].children().len() != 1 {
                continue;
            }

            let child = self[index].children()[0];
            let parent = self[index]
                .parent()
                .expect("non-root vertex must have a parent");

            let summed = self[index].branch_length_or_zero() + self[child].branch_length_or_zero();
            self.vertices[child].set_branch_length(Some(BranchLength::new(summed)));
            self.vertices[child].set_parent(Some(parent));

            let slot = self.child_slot(parent, index);
            self.vertices[parent].children_mut()[slot] = child;

            self.vertices[index].children_mut().clear();
            self.vertices[index].set_parent(None);
        }
    }

    /// Returns `true` if any reachable vertex has exactly one child.
    pub fn has_unary_vertices(&self) -> bool {
        self.pre_order_iter().any(|v| v.children().len() == 1)
    }

    /// Position of `child` in `parent`'s child list.
    fn child_slot(&self, parent: TreeIndex, child: TreeIndex) -> usize {
        self[parent]
            .children()
            .iter()
            .position(|&c| c == child)
            .expect("child not present in parent's child list")
    }
}

// ============================================================================
// Validation and printing (pub)
// ============================================================================
impl Tree {
    /// Validates the reachable tree structure.
    ///
    /// Checks:
    /// - Root index is set, in bounds, and the root has no parent
    /// - Every reachable child points back to its parent
    /// - No vertex is reachable twice (no cycles, no shared children)
    /// - At least one leaf is reachable
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index == NO_ROOT_SET_INDEX || self.root_index >= self.vertices.len() {
            return false;
        }

        if self.root().parent().is_some() {
            return false;
        }

        let mut seen = vec![false; self.vertices.len()];
        let mut leaf_count = 0;
        let mut stack = vec![self.root_index];

        while let Some(index) = stack.pop() {
            if seen[index] {
                return false;
            }
            seen[index] = true;

            let vertex = &self[index];
            if vertex.is_leaf() {
                leaf_count += 1;
            }

            for &child in vertex.children() {
                if child >= self.vertices.len() || self[child].parent() != Some(index) {
                    return false;
                }
                stack.push(child);
            }
        }

        leaf_count > 0
    }

    /// Returns `true` if every non-root reachable vertex has a branch
    /// length.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.pre_order_iter()
            .filter(|v| v.index() != self.root_index)
            .all(|v| v.branch_length().is_some())
    }

    /// Convenience method to convert this tree to a Newick string.
    pub fn to_newick(&self) -> String {
        newick::to_newick(self)
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without
/// recursion. Each vertex is visited before any of its descendants,
/// children in stored order.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<TreeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children in reverse so stored order is visited first
        for &child in vertex.children().iter().rev() {
            self.stack.push(child);
        }

        Some(vertex)
    }
}

/// Iterator over the ancestors of a vertex, nearest first.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    current: Option<TreeIndex>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = TreeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        self.current = self.tree[index].parent();
        Some(index)
    }
}
