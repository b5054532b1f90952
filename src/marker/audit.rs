//! Post-hoc consistency audit of placed rank labels.
//!
//! Rank placement is heuristic, so the result is verified independently
//! rather than enforced during marking: for every tip, the rank runs on its
//! ancestor chain must be non-decreasing from root to tip. A violation is
//! collected as a [Finding], never raised as an error.

use std::collections::HashSet;
use std::fmt;

use crate::model::Tree;
use crate::taxonomy::Rank;

/// A single taxonomic inconsistency: a vertex whose rank run starts
/// shallower than a rank already seen deeper in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Encoded label of the offending vertex.
    pub label: String,
    /// The offending rank run.
    pub ranks: Vec<Rank>,
    /// Deepest rank the run was allowed to start at.
    pub expected_at_most: Rank,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let run: Vec<&str> = self.ranks.iter().map(|r| r.prefix()).collect();
        write!(
            f,
            "vertex '{}' carries rank run {} but may start no deeper than {}",
            self.label,
            run.join(";"),
            self.expected_at_most.prefix()
        )
    }
}

/// Outcome of the consistency audit. Empty means consistent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsistencyReport {
    findings: Vec<Finding>,
}

impl ConsistencyReport {
    /// Returns `true` if no inconsistency was found.
    pub fn is_consistent(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns the collected inconsistencies.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_consistent() {
            return write!(f, "taxonomic consistency check passed");
        }

        writeln!(
            f,
            "taxonomic consistency check found {} inconsistent vertices:",
            self.findings.len()
        )?;
        for finding in &self.findings {
            writeln!(f, "  {}", finding)?;
        }
        Ok(())
    }
}

/// Audits the placed rank labels of a tree.
///
/// Walks the ancestor chain of every tip from tip to root. The first
/// (shallowest) token of every rank run encountered must be at or above the
/// most recent rank seen on the way up, starting from the deepest rank.
/// Every violating vertex is reported once, across all tips.
pub fn audit(tree: &Tree) -> ConsistencyReport {
    let mut findings = Vec::new();
    let mut reported: HashSet<usize> = HashSet::new();

    let tips: Vec<usize> = tree
        .pre_order_iter()
        .filter(|v| v.is_leaf())
        .map(|v| v.index())
        .collect();

    for tip in tips {
        let mut cur_rank = Rank::Strain;

        for ancestor in tree.ancestor_indices(tip) {
            let label = tree[ancestor].label();
            if !label.has_ranks() {
                continue;
            }

            let first = label.ranks[0];
            if first > cur_rank && reported.insert(ancestor) {
                findings.push(Finding {
                    label: label.encode(),
                    ranks: label.ranks.clone(),
                    expected_at_most: cur_rank,
                });
            }

            cur_rank = first;
        }
    }

    ConsistencyReport { findings }
}
