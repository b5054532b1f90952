//! Newick format serialization.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::model::tree::{Tree, TreeIndex};
use crate::model::vertex::BranchLength;
use crate::parser::utils::escape_label;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Writes the given tree to a file in Newick format, followed by a newline.
///
/// Node names are encoded from their structured labels and escaped if
/// necessary.
///
/// # Arguments
/// * `file` - The file to write to
/// * `tree` - The tree to write
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file(file: File, tree: &Tree) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(to_newick(tree).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Names of leaves, internal vertices, and the root are written from their
/// encoded labels; a branch length is written for every vertex that has
/// one, except the root. Only vertices reachable from the root are
/// serialized.
///
/// # Example
/// ```
/// use taxmark::model::{BranchLength, Tree};
/// use taxmark::taxonomy::NodeLabel;
///
/// let mut tree = Tree::new(2);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), NodeLabel::taxon("a"));
/// let b = tree.add_leaf(Some(BranchLength::new(2.0)), NodeLabel::taxon("b"));
/// tree.add_root(vec![a, b], NodeLabel::default());
///
/// assert_eq!(tree.to_newick(), "(a:1,b:2);");
/// ```
pub fn to_newick(tree: &Tree) -> String {
    // Helper for adding branch lengths
    fn build_newick_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
        if let Some(branch_length) = branch_length {
            newick.push(':');
            newick.push_str(&branch_length.to_string());
        }
    }

    // Helper for adding an encoded, escaped node name
    fn build_newick_label(newick: &mut String, tree: &Tree, index: TreeIndex) {
        let label = tree[index].label();
        if !label.is_empty() {
            newick.push_str(&escape_label(&label.encode()));
        }
    }

    // Recursive helper for building the Newick string
    fn build_newick(tree: &Tree, newick: &mut String, index: TreeIndex) {
        let vertex = &tree[index];

        if vertex.is_leaf() {
            build_newick_label(newick, tree, index);
            build_newick_branch_length(newick, vertex.branch_length());
        } else {
            newick.push('(');
            for (i, &child) in vertex.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child);
            }
            newick.push(')');

            build_newick_label(newick, tree, index);
            if index != tree.root_index() {
                build_newick_branch_length(newick, vertex.branch_length());
            }
        }
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));

    build_newick(tree, &mut newick, tree.root_index());
    newick.push(';');

    newick
}

/// Estimates the length of the Newick string for a given tree.
///
/// Accounts for structure, escaped node names, and branch lengths; used to
/// pre-allocate string capacity.
fn estimate_newick_len(tree: &Tree) -> usize {
    // Each internal node: "(,)" ~= 3 chars
    const INTERNAL_NODE_CHARS: usize = 3;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    let mut label_capacity = 0;
    let mut num_internal = 0;
    let mut num_with_branch_length = 0;

    for vertex in tree.pre_order_iter() {
        if !vertex.is_leaf() {
            num_internal += 1;
        }
        if vertex.branch_length().is_some() {
            num_with_branch_length += 1;
        }
        let label = vertex.label();
        if !label.is_empty() {
            label_capacity += escape_label(&label.encode()).len();
        }
    }

    num_internal * INTERNAL_NODE_CHARS
        + label_capacity
        + num_with_branch_length * BRANCH_LENGTH_CHARS
        + BUFFER_CHARS
}
