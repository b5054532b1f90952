use taxmark::newick::{self, NewickParser};
use taxmark::parser::{ByteParser, ParsingErrorKind};
use taxmark::taxonomy::Rank;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let tree = newick::parse_str("((a:1.0,b:2.0)x:3.0,c:4.0);").unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Test relationships
    // - Root has children (x, c)
    let root = tree.root();
    let root_index = root.index();
    assert_eq!(root.children().len(), 2);
    let x_index = root.children()[0];
    let c_index = root.children()[1];

    // - Internal vertex x has children (a, b)
    let x = tree.vertex(x_index);
    assert!(!x.is_leaf());
    assert_eq!(x.label().taxon.as_deref(), Some("x"));
    let a_index = x.children()[0];
    let b_index = x.children()[1];

    // - Three leaves
    assert!(tree.vertex(a_index).is_leaf());
    assert!(tree.vertex(b_index).is_leaf());
    assert!(tree.vertex(c_index).is_leaf());
    assert_eq!(tree.vertex(a_index).label().taxon.as_deref(), Some("a"));
    assert_eq!(tree.vertex(b_index).label().taxon.as_deref(), Some("b"));
    assert_eq!(tree.vertex(c_index).label().taxon.as_deref(), Some("c"));

    // - Parent relationships
    assert_eq!(x.parent(), Some(root_index));
    assert_eq!(tree.vertex(a_index).parent(), Some(x_index));
    assert_eq!(tree.vertex(b_index).parent(), Some(x_index));
    assert_eq!(tree.vertex(c_index).parent(), Some(root_index));
}

#[test]
fn test_polytomy() {
    let tree = newick::parse_str("(a:1,b:1,c:1,d:1);").unwrap();

    assert_eq!(tree.root().children().len(), 4);
    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());
}

#[test]
fn test_configured_parser() {
    let mut byte_parser = ByteParser::from_str("((a:1.0,b:2.0):3.0,c:4.0);");
    let tree = NewickParser::new()
        .with_num_leaves(3)
        .parse(&mut byte_parser)
        .unwrap();

    assert_eq!(tree.num_leaves(), 3);
}

#[test]
fn test_internal_support_value() {
    let tree = newick::parse_str("((a:1,b:1)97:0.5,c:1);").unwrap();

    let internal = tree.vertex(tree.root().children()[0]);
    assert_eq!(internal.label().support, Some(97.0));
    assert_eq!(internal.label().taxon, None);
}

#[test]
fn test_internal_support_and_taxon() {
    let tree = newick::parse_str("((a:1,b:1)'97:Bacilli':0.5,c:1);").unwrap();

    let internal = tree.vertex(tree.root().children()[0]);
    assert_eq!(internal.label().support, Some(97.0));
    assert_eq!(internal.label().taxon.as_deref(), Some("Bacilli"));
}

#[test]
fn test_rank_run_in_name() {
    let tree = newick::parse_str("((a:1,b:1)'t1|D__;P__':0.5,c:1);").unwrap();

    let internal = tree.vertex(tree.root().children()[0]);
    assert_eq!(internal.label().taxon.as_deref(), Some("t1"));
    assert_eq!(internal.label().ranks, vec![Rank::Domain, Rank::Phylum]);
}

#[test]
fn test_invalid_rank_token() {
    let result = newick::parse_str("((a:1,b:1)'t1|X__':0.5,c:1);");

    let err = result.unwrap_err();
    assert_eq!(
        err.kind(),
        &ParsingErrorKind::InvalidRankToken("X__".to_string())
    );
}

#[test]
fn test_quoted_labels() {
    let tree =
        newick::parse_str("(('Taxon one':1.5,'Second''s taxon':2.5):3.0,'3rd Taxon':4.0);")
            .unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert!(tree.find_by_taxon("Taxon one").is_ok());
    assert!(tree.find_by_taxon("Second's taxon").is_ok());
    assert!(tree.find_by_taxon("3rd Taxon").is_ok());
}

#[test]
fn test_whitespace_and_comments() {
    let tree = newick::parse_str("[header] ( a:1 , [x] b:2 ) [trailer] ;").unwrap();

    assert_eq!(tree.num_leaves(), 2);
    assert!(tree.find_by_taxon("a").is_ok());
}

#[test]
fn test_scientific_notation() {
    let tree = newick::parse_str("((a:1e-5,b:2.5E+3):1.0e2,c:3.14E-10);").unwrap();

    assert_eq!(tree.num_leaves(), 3);
    let a = tree.find_by_taxon("a").unwrap();
    assert!((tree[a].branch_length_or_zero() - 1e-5).abs() < 1e-12);
}

#[test]
fn test_optional_branch_length() {
    let tree = newick::parse_str("((a:1.0,b),c:4.0);").unwrap();

    assert_eq!(tree.num_leaves(), 3);
    let b = tree.find_by_taxon("b").unwrap();
    assert_eq!(tree[b].branch_length(), None);
    assert!(!tree.vertices_have_branch_lengths());
}

// --- TESTS ERROR HANDLING ---
#[test]
fn test_missing_semicolon() {
    let result = newick::parse_str("(a:1,b:2)");
    assert!(matches!(
        result.unwrap_err().kind(),
        ParsingErrorKind::InvalidNewickString(_)
    ));
}

#[test]
fn test_unbalanced_parentheses() {
    let result = newick::parse_str("((a:1,b:2;");
    assert!(result.is_err());
}

#[test]
fn test_invalid_branch_length() {
    let result = newick::parse_str("(a:xyz,b:1);");
    assert!(matches!(
        result.unwrap_err().kind(),
        ParsingErrorKind::InvalidBranchLength(_)
    ));
}

#[test]
fn test_negative_branch_length() {
    let result = newick::parse_str("(a:-1,b:1);");
    assert!(matches!(
        result.unwrap_err().kind(),
        ParsingErrorKind::InvalidBranchLength(_)
    ));
}

#[test]
fn test_unclosed_comment() {
    let result = newick::parse_str("(a:1,b:2[oops;");
    assert!(matches!(
        result.unwrap_err().kind(),
        ParsingErrorKind::UnclosedComment
    ));
}

#[test]
fn test_error_carries_position() {
    let err = newick::parse_str("(a:1 b:2);").unwrap_err();
    assert!(err.position() > 0);
}

// --- TESTS NEWICK WRITING ---
#[test]
fn test_round_trip_plain() {
    let input = "((a:1,b:2)x:3,c:4);";
    let tree = newick::parse_str(input).unwrap();
    assert_eq!(tree.to_newick(), input);
}

#[test]
fn test_round_trip_support_label_quoted() {
    let input = "((a:1,b:1)'97:Bacilli':2,c:1);";
    let tree = newick::parse_str(input).unwrap();
    assert_eq!(tree.to_newick(), input);
}

#[test]
fn test_round_trip_rank_run_quoted() {
    let input = "((a:1,b:1)'t1|P__;C__':2,c:1);";
    let tree = newick::parse_str(input).unwrap();
    assert_eq!(tree.to_newick(), input);
}

#[test]
fn test_write_omits_root_branch_length() {
    let tree = newick::parse_str("((a:1,b:2):3,c:4):9;").unwrap();
    assert_eq!(tree.to_newick(), "((a:1,b:2):3,c:4);");
}
