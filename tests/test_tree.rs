use taxmark::model::{BranchLength, FindError, Tree};
use taxmark::newick;
use taxmark::taxonomy::NodeLabel;

/// ((a:1,b:2)x:3,c:4)r
fn build_basic_tree() -> Tree {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf(Some(BranchLength::new(1.0)), NodeLabel::taxon("a"));
    let b = tree.add_leaf(Some(BranchLength::new(2.0)), NodeLabel::taxon("b"));
    let c = tree.add_leaf(Some(BranchLength::new(4.0)), NodeLabel::taxon("c"));
    let x = tree.add_internal_vertex(
        vec![a, b],
        Some(BranchLength::new(3.0)),
        NodeLabel::taxon("x"),
    );
    tree.add_root(vec![x, c], NodeLabel::taxon("r"));
    tree
}

// --- TESTS CONSTRUCTION AND COUNTS ---
#[test]
fn test_manual_construction() {
    let tree = build_basic_tree();

    assert!(tree.is_root_set());
    assert!(tree.is_valid());
    assert_eq!(tree.num_vertices(), 5);
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert!(tree.vertices_have_branch_lengths());
}

#[test]
fn test_index_access() {
    let tree = build_basic_tree();
    let root_index = tree.root_index();

    assert_eq!(tree[root_index].label().taxon.as_deref(), Some("r"));
    assert_eq!(tree.vertex(root_index).index(), root_index);
    assert_eq!(tree.root().parent(), None);
}

// --- TESTS TRAVERSAL ---
#[test]
fn test_pre_order_parents_before_children() {
    let tree = build_basic_tree();

    let order: Vec<String> = tree
        .pre_order_iter()
        .map(|v| v.label().taxon.clone().unwrap())
        .collect();
    assert_eq!(order, vec!["r", "x", "a", "b", "c"]);
}

#[test]
fn test_tip_indices_under() {
    let tree = build_basic_tree();
    let x = tree.find_by_taxon("x").unwrap();
    let a = tree.find_by_taxon("a").unwrap();

    let tips: Vec<String> = tree
        .tip_indices_under(x)
        .iter()
        .map(|&i| tree[i].label().taxon.clone().unwrap())
        .collect();
    assert_eq!(tips, vec!["a", "b"]);

    // A tip queried for itself yields just itself
    assert_eq!(tree.tip_indices_under(a), vec![a]);
}

#[test]
fn test_ancestor_indices() {
    let tree = build_basic_tree();
    let a = tree.find_by_taxon("a").unwrap();
    let x = tree.find_by_taxon("x").unwrap();

    let ancestors: Vec<usize> = tree.ancestor_indices(a).collect();
    assert_eq!(ancestors, vec![x, tree.root_index()]);

    let none: Vec<usize> = tree.ancestor_indices(tree.root_index()).collect();
    assert!(none.is_empty());
}

#[test]
fn test_distance_to_ancestor() {
    let tree = build_basic_tree();
    let a = tree.find_by_taxon("a").unwrap();
    let x = tree.find_by_taxon("x").unwrap();

    assert_eq!(tree.distance_to_ancestor(a, x), 1.0);
    assert_eq!(tree.distance_to_ancestor(a, tree.root_index()), 4.0);
    assert_eq!(tree.distance_to_ancestor(x, x), 0.0);
}

// --- TESTS LOOKUP ---
#[test]
fn test_find_by_taxon() {
    let tree = build_basic_tree();

    let b = tree.find_by_taxon("b").unwrap();
    assert_eq!(tree[b].label().taxon.as_deref(), Some("b"));

    assert_eq!(
        tree.find_by_taxon("nope"),
        Err(FindError::NotFound("nope".to_string()))
    );
}

#[test]
fn test_find_by_taxon_ambiguous() {
    let tree = newick::parse_str("((a:1,b:1)x:1,(c:1,d:1)x:1)r;").unwrap();

    assert_eq!(
        tree.find_by_taxon("x"),
        Err(FindError::Ambiguous("x".to_string()))
    );
}

// --- TESTS STRUCTURAL MUTATION ---
#[test]
fn test_insert_above() {
    let mut tree = build_basic_tree();
    let a = tree.find_by_taxon("a").unwrap();
    let x = tree.find_by_taxon("x").unwrap();
    let root = tree.root_index();

    let inserted = tree.insert_above(a, 0.25, NodeLabel::taxon("dummy"));

    // Slot of a in x's child list is taken over by the new vertex
    assert_eq!(tree[x].children()[0], inserted);
    assert_eq!(tree[inserted].parent(), Some(x));
    assert_eq!(tree[inserted].children(), &[a]);
    assert_eq!(tree[a].parent(), Some(inserted));

    // Branch lengths split, total path length preserved
    assert_eq!(tree[inserted].branch_length_or_zero(), 0.25);
    assert_eq!(tree[a].branch_length_or_zero(), 0.75);
    assert_eq!(tree.distance_to_ancestor(a, root), 4.0);

    assert!(tree.is_valid());
    assert!(tree.has_unary_vertices());
    assert_eq!(tree.num_vertices(), 6);
}

#[test]
fn test_splice_unary_vertices() {
    let mut tree = build_basic_tree();
    let a = tree.find_by_taxon("a").unwrap();
    let c = tree.find_by_taxon("c").unwrap();
    let root = tree.root_index();

    tree.insert_above(a, 0.25, NodeLabel::default());
    tree.insert_above(c, 1.5, NodeLabel::default());
    assert!(tree.has_unary_vertices());

    tree.splice_unary_vertices();

    assert!(!tree.has_unary_vertices());
    assert!(tree.is_valid());
    assert_eq!(tree.num_vertices(), 5);
    assert_eq!(tree.distance_to_ancestor(a, root), 4.0);
    assert_eq!(tree.distance_to_ancestor(c, root), 4.0);
    assert_eq!(tree[a].branch_length_or_zero(), 1.0);
    assert_eq!(tree[c].branch_length_or_zero(), 4.0);
}

#[test]
fn test_splice_chain_of_unary_vertices() {
    let mut tree = build_basic_tree();
    let a = tree.find_by_taxon("a").unwrap();
    let root = tree.root_index();

    // Two stacked placeholders on the same branch
    tree.insert_above(a, 0.5, NodeLabel::default());
    tree.insert_above(a, 0.25, NodeLabel::default());

    tree.splice_unary_vertices();

    assert!(!tree.has_unary_vertices());
    assert_eq!(tree.distance_to_ancestor(a, root), 4.0);
    assert_eq!(tree[a].branch_length_or_zero(), 1.0);
}

#[test]
fn test_splice_is_idempotent() {
    let mut tree = build_basic_tree();
    let a = tree.find_by_taxon("a").unwrap();
    tree.insert_above(a, 0.5, NodeLabel::default());

    tree.splice_unary_vertices();
    let first = tree.to_newick();
    tree.splice_unary_vertices();

    assert_eq!(tree.to_newick(), first);
}

#[test]
fn test_sibling_order_stable_through_insert_and_splice() {
    let mut tree = newick::parse_str("(a:1,b:1,c:1,d:1)r;").unwrap();
    let b = tree.find_by_taxon("b").unwrap();

    tree.insert_above(b, 0.5, NodeLabel::default());
    tree.splice_unary_vertices();

    assert_eq!(tree.to_newick(), "(a:1,b:1,c:1,d:1)r;");
}
