//! Prediction of taxonomic ranks for internal vertices.
//!
//! [RankMarker] walks a tree rank-by-rank from a set of anchor vertices with
//! known rank toward the leaves. The mean branch-length distance from each
//! lineage to its leaves decides where the next rank boundary falls;
//! transient dummy vertices keep every lineage represented at every rank and
//! are spliced out before the tree is returned. The result is independently
//! verified by the [mod@audit] module.
//!
//! # Example
//! ```
//! use taxmark::marker::RankMarker;
//! use taxmark::newick;
//! use taxmark::taxonomy::Rank;
//!
//! let tree = newick::parse_str("((a:5,b:5)t1:1,(c:1,d:1)t2:5)root;").unwrap();
//! let (tree, report) = RankMarker::new()
//!     .mark(tree, &["root"], Rank::Domain)
//!     .unwrap();
//!
//! assert!(report.is_consistent());
//! assert!(tree.to_newick().contains("root|D__"));
//! ```

pub mod audit;

use std::collections::{HashMap, HashSet};
use std::io;

use thiserror::Error;

use crate::model::tree::{FindError, Tree, TreeIndex};
use crate::taxonomy::{NodeLabel, Rank};

pub use audit::audit;
pub use audit::ConsistencyReport;
pub use audit::Finding;

// =#========================================================================#=
// MARK ERROR
// =#========================================================================#=
/// Errors that abort a [RankMarker::mark] invocation.
///
/// All variants are fatal; the partially mutated tree is dropped with the
/// error, so a caller never observes a half-labeled tree. A failed
/// consistency audit is deliberately not an error (see [mod@audit]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkError {
    /// An anchor taxon did not resolve to any vertex.
    #[error("unable to locate anchor vertex with taxon '{0}'")]
    AnchorNotFound(String),

    /// An anchor taxon resolved to more than one vertex.
    #[error("anchor taxon '{0}' is ambiguous: multiple vertices carry it")]
    AmbiguousAnchor(String),

    /// A vertex ended up below the rank boundary that should contain it.
    /// Indicates malformed topology or branch lengths.
    #[error(
        "vertex '{label}' sits {distance} below the {rank} boundary that should contain it"
    )]
    NodeBelowRank {
        label: String,
        rank: Rank,
        distance: f64,
    },

    /// A vertex targeted for marking already carries a rank run. Indicates
    /// a tree that was already (partially) labeled.
    #[error("vertex '{0}' already carries a rank run")]
    AlreadyRanked(String),
}

// =#========================================================================#=
// RANK MARKER
// =#========================================================================#=
/// Assigns predicted taxonomic ranks to the internal vertices of a tree.
///
/// # Configuration
/// * `with_min_support(support)` - Vertices whose bootstrap support is below
///   this threshold are skipped (not failed) when marking. Vertices without
///   a support value count as support 0. Defaults to 0.
///
/// # Algorithm
/// Starting from the anchors (tagged with the start rank, boundary distance
/// 0), each rank level from the start rank up to the level above genus is
/// processed in turn:
/// 1. Children of vertices at the current rank become candidate lineages;
///    candidates whose parent is also a candidate are dropped, leaving the
///    most basal vertex of each lineage (its head).
/// 2. Per head, the remaining average depth (boundary distance plus mean
///    distance to leaves) is spread evenly over the remaining rank levels,
///    yielding the distance to the next rank boundary.
/// 3. A depth-first walk from the head marks every vertex within that
///    boundary: at the current rank in the upper half, at the next rank in
///    the lower half (the boundary itself is inclusive on both comparisons).
/// 4. A lineage with no vertex within the boundary gets a dummy vertex
///    inserted on the branch above its head, so the next rank level still
///    has a representative there.
///
/// Dummy vertices are spliced out before the tree is returned and the
/// result is audited for root-to-tip rank consistency.
pub struct RankMarker {
    min_support: f64,
}

impl RankMarker {
    /// Creates a new `RankMarker` with default settings (no support
    /// threshold).
    pub fn new() -> Self {
        Self { min_support: 0.0 }
    }

    /// Sets the minimum bootstrap support required to mark a vertex.
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Marks the internal vertices of a tree with predicted taxonomic
    /// ranks.
    ///
    /// Consumes the tree and returns it together with the result of the
    /// consistency audit. A non-empty report is logged at warn level but is
    /// not an error.
    ///
    /// # Arguments
    /// * `tree` - The tree to label
    /// * `anchors` - Taxa identifying the anchor vertices (exact match)
    /// * `start_rank` - The rank the anchors represent
    ///
    /// # Errors
    /// * [MarkError::AnchorNotFound] / [MarkError::AmbiguousAnchor] if an
    ///   anchor does not resolve; no mutation has happened at this point
    /// * [MarkError::AlreadyRanked] if a vertex targeted for marking
    ///   already carries a rank run
    /// * [MarkError::NodeBelowRank] if the propagation invariant is broken
    pub fn mark(
        &self,
        mut tree: Tree,
        anchors: &[&str],
        start_rank: Rank,
    ) -> Result<(Tree, ConsistencyReport), MarkError> {
        // Resolve and validate all anchors before mutating anything
        let anchor_indices = self.resolve_anchors(&tree, anchors)?;

        // Scratch distance to the boundary of each vertex's rank, scoped to
        // this invocation
        let mut boundary_dist: HashMap<TreeIndex, f64> = HashMap::new();

        for &anchor in &anchor_indices {
            tree[anchor].label_mut().ranks = vec![start_rank];
            boundary_dist.insert(anchor, 0.0);
        }

        let mut active: Vec<TreeIndex> = anchor_indices;
        let mut active_set: HashSet<TreeIndex> = active.iter().copied().collect();

        // Rank levels domain through family; the denominator below counts
        // the remaining intervals down to genus and must never reach zero
        let num_intervals = Rank::Genus.index();
        for cur_index in start_rank.index()..num_intervals {
            let cur_rank = Rank::from_index(cur_index);
            let next_rank = Rank::from_index(cur_index + 1);
            log::debug!("processing rank {}", cur_rank);

            // Collect the lineages below the current rank
            let mut candidates: Vec<TreeIndex> = Vec::new();
            let mut candidate_set: HashSet<TreeIndex> = HashSet::new();
            for &n in &active {
                let dist = boundary_dist[&n];
                if dist > 0.0 {
                    return Err(MarkError::NodeBelowRank {
                        label: tree[n].label().encode(),
                        rank: cur_rank,
                        distance: dist,
                    });
                }

                for &child in tree[n].children() {
                    if !active_set.contains(&child) {
                        boundary_dist.insert(child, dist + tree[child].branch_length_or_zero());
                        if candidate_set.insert(child) {
                            candidates.push(child);
                        }
                    }
                }
            }

            // Keep only the most basal vertex of each lineage
            let heads: Vec<TreeIndex> = candidates
                .iter()
                .copied()
                .filter(|&n| match tree[n].parent() {
                    Some(parent) => !candidate_set.contains(&parent),
                    None => true,
                })
                .collect();

            let mut next_active: Vec<TreeIndex> = Vec::new();
            let mut next_active_set: HashSet<TreeIndex> = HashSet::new();

            for head in heads {
                let dist_to_current_rank = boundary_dist[&head];

                // Spread the remaining average depth over the remaining
                // rank levels
                let average_dist = mean_dist_to_leaves(&tree, head);
                let dist_to_child_rank = (dist_to_current_rank + average_dist)
                    / (num_intervals - cur_index) as f64;
                log::debug!(
                    "lineage '{}': boundary distance {}, next boundary at {}",
                    tree[head].label().encode(),
                    dist_to_current_rank,
                    dist_to_child_rank
                );

                // Mark vertices at the current or child rank
                let mut stack = vec![head];
                let mut marked: Vec<TreeIndex> = Vec::new();

                while let Some(n) = stack.pop() {
                    let dist_from_current_rank = if n == head {
                        dist_to_current_rank
                    } else {
                        tree.distance_to_ancestor(n, head) + dist_to_current_rank
                    };

                    if dist_from_current_rank <= dist_to_child_rank {
                        // Boundary-inclusive on both comparisons
                        let rank = if dist_from_current_rank <= 0.5 * dist_to_child_rank {
                            cur_rank
                        } else {
                            next_rank
                        };

                        self.mark_rank(&mut tree, n, rank)?;
                        boundary_dist.insert(n, dist_from_current_rank - dist_to_child_rank);

                        // Descendants may still sit above the boundary
                        marked.push(n);
                        for &child in tree[n].children() {
                            stack.push(child);
                        }
                    }
                }

                // A lineage with no vertex within the boundary still needs
                // a representative at the child rank
                if marked.is_empty() {
                    let dummy =
                        self.insert_dummy(&mut tree, head, next_rank, dist_to_child_rank, &boundary_dist);
                    boundary_dist.insert(dummy, 0.0);
                    marked.push(dummy);
                }

                for n in marked {
                    if next_active_set.insert(n) {
                        next_active.push(n);
                    }
                }
            }

            active = next_active;
            active_set = next_active_set;
        }

        tree.splice_unary_vertices();

        let report = audit::audit(&tree);
        if !report.is_consistent() {
            log::warn!("{}", report);
        }

        Ok((tree, report))
    }

    /// Resolves all anchor taxa to vertex indices, rejecting anchors that
    /// are missing, ambiguous, or already ranked.
    fn resolve_anchors(
        &self,
        tree: &Tree,
        anchors: &[&str],
    ) -> Result<Vec<TreeIndex>, MarkError> {
        let mut indices = Vec::with_capacity(anchors.len());
        for &anchor in anchors {
            let index = tree.find_by_taxon(anchor).map_err(|err| match err {
                FindError::NotFound(taxon) => MarkError::AnchorNotFound(taxon),
                FindError::Ambiguous(taxon) => MarkError::AmbiguousAnchor(taxon),
            })?;

            if tree[index].label().has_ranks() {
                return Err(MarkError::AlreadyRanked(tree[index].label().encode()));
            }

            indices.push(index);
        }
        Ok(indices)
    }

    /// Marks a single vertex with the given rank, back-filling skipped
    /// levels.
    ///
    /// Marking is refused (silently) for tips, for the species rank, and
    /// for vertices below the support threshold.
    fn mark_rank(&self, tree: &mut Tree, index: TreeIndex, rank: Rank) -> Result<(), MarkError> {
        if tree[index].is_leaf() {
            return Ok(());
        }

        // Species labels are reserved for names already present at leaves
        if rank == Rank::Species {
            return Ok(());
        }

        let label = tree[index].label();
        if label.has_ranks() {
            return Err(MarkError::AlreadyRanked(label.encode()));
        }

        if label.support.unwrap_or(0.0) < self.min_support {
            return Ok(());
        }

        // Back-fill the run from the nearest ranked ancestor so no rank
        // level is silently skipped on this path
        let run = match marked_parent(tree, index) {
            Some(deepest) if deepest < rank => {
                Rank::ALL[deepest.index() + 1..=rank.index()].to_vec()
            }
            Some(_) => vec![rank],
            None => Rank::ALL[..=rank.index()].to_vec(),
        };

        tree[index].label_mut().ranks = run;

        Ok(())
    }

    /// Inserts a dummy vertex on the branch above a lineage head, at the
    /// next rank's boundary.
    fn insert_dummy(
        &self,
        tree: &mut Tree,
        head: TreeIndex,
        next_rank: Rank,
        dist_to_child_rank: f64,
        boundary_dist: &HashMap<TreeIndex, f64>,
    ) -> TreeIndex {
        let mut label = tree[head].label().clone();
        if !tree[head].is_leaf() && next_rank != Rank::Species {
            label.ranks = vec![next_rank];
        } else {
            label.ranks = Vec::new();
        }

        let parent = tree[head]
            .parent()
            .expect("lineage head must have a parent");
        let parent_dist = *boundary_dist
            .get(&parent)
            .expect("parent of a lineage head must carry a boundary distance");

        tree.insert_above(head, dist_to_child_rank - parent_dist, label)
    }
}

impl Default for RankMarker {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers (pub where independently testable)
// ============================================================================

/// Returns the mean branch-length distance from a vertex to the leaves
/// beneath it. A tip has mean distance 0.
pub fn mean_dist_to_leaves(tree: &Tree, index: TreeIndex) -> f64 {
    if tree[index].is_leaf() {
        return 0.0;
    }

    let tips = tree.tip_indices_under(index);
    let total: f64 = tips
        .iter()
        .map(|&tip| tree.distance_to_ancestor(tip, index))
        .sum();

    total / tips.len() as f64
}

/// Returns the deepest rank of the nearest ranked ancestor, skipping dummy
/// (single-child) vertices, or `None` when no ancestor is ranked.
fn marked_parent(tree: &Tree, index: TreeIndex) -> Option<Rank> {
    for ancestor in tree.ancestor_indices(index) {
        // Single-child vertices are transient bookkeeping, not lineage
        // representatives
        if tree[ancestor].children().len() == 1 {
            continue;
        }

        if let Some(rank) = tree[ancestor].label().deepest_rank() {
            return Some(rank);
        }
    }

    None
}

/// Writes the consistency table for a labeled tree.
///
/// One row per vertex whose label carries a bootstrap support value, in
/// preorder. Two tab-separated columns: the support/taxon label, and the
/// rank run joined by `;` or `<none>` when the vertex is unranked.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_consistency<W: io::Write>(tree: &Tree, out: &mut W) -> io::Result<()> {
    for vertex in tree.pre_order_iter() {
        let label = vertex.label();
        if label.support.is_none() {
            continue;
        }

        let ranks = if label.has_ranks() {
            label
                .ranks
                .iter()
                .map(|r| r.prefix())
                .collect::<Vec<_>>()
                .join(";")
        } else {
            "<none>".to_string()
        };

        writeln!(out, "{}\t{}", label.name_text(), ranks)?;
    }

    Ok(())
}
