use taxmark::taxonomy::rank::UnknownRank;
use taxmark::taxonomy::{NodeLabel, Rank};

// --- TESTS RANK ---
#[test]
fn test_rank_order() {
    assert!(Rank::Domain < Rank::Phylum);
    assert!(Rank::Genus < Rank::Species);
    assert!(Rank::Species < Rank::Strain);
    assert_eq!(Rank::Domain.index(), 0);
    assert_eq!(Rank::Strain.index(), 7);
}

#[test]
fn test_rank_prefixes() {
    assert_eq!(Rank::Domain.prefix(), "D__");
    assert_eq!(Rank::Strain.prefix(), "ST__");
    assert_eq!(Rank::from_prefix("C__"), Some(Rank::Class));
    assert_eq!(Rank::from_prefix("Z__"), None);

    for rank in Rank::ALL {
        assert_eq!(Rank::from_prefix(rank.prefix()), Some(rank));
        assert_eq!(Rank::from_index(rank.index()), rank);
    }
}

#[test]
fn test_rank_next() {
    assert_eq!(Rank::Domain.next(), Some(Rank::Phylum));
    assert_eq!(Rank::Species.next(), Some(Rank::Strain));
    assert_eq!(Rank::Strain.next(), None);
}

#[test]
fn test_rank_from_str() {
    assert_eq!("domain".parse::<Rank>(), Ok(Rank::Domain));
    assert_eq!("Phylum".parse::<Rank>(), Ok(Rank::Phylum));
    assert_eq!("G__".parse::<Rank>(), Ok(Rank::Genus));
    assert_eq!(
        "kingdom".parse::<Rank>(),
        Err(UnknownRank("kingdom".to_string()))
    );
}

#[test]
fn test_rank_display() {
    assert_eq!(Rank::Class.to_string(), "class");
}

// --- TESTS NODE LABEL DECODING ---
#[test]
fn test_parse_empty() {
    let label = NodeLabel::parse("").unwrap();
    assert!(label.is_empty());
    assert_eq!(label.encode(), "");
}

#[test]
fn test_parse_taxon_only() {
    let label = NodeLabel::parse("Bacilli").unwrap();
    assert_eq!(label.support, None);
    assert_eq!(label.taxon.as_deref(), Some("Bacilli"));
    assert!(!label.has_ranks());
}

#[test]
fn test_parse_bare_number_is_support() {
    let label = NodeLabel::parse("85").unwrap();
    assert_eq!(label.support, Some(85.0));
    assert_eq!(label.taxon, None);
}

#[test]
fn test_parse_support_and_taxon() {
    let label = NodeLabel::parse("97:Bacilli").unwrap();
    assert_eq!(label.support, Some(97.0));
    assert_eq!(label.taxon.as_deref(), Some("Bacilli"));
}

#[test]
fn test_parse_colon_without_support() {
    // ':' present but no leading number; the whole text is the taxon
    let label = NodeLabel::parse("abc:def").unwrap();
    assert_eq!(label.support, None);
    assert_eq!(label.taxon.as_deref(), Some("abc:def"));
}

#[test]
fn test_parse_rank_run() {
    let label = NodeLabel::parse("Bacilli|D__;P__;C__").unwrap();
    assert_eq!(label.taxon.as_deref(), Some("Bacilli"));
    assert_eq!(label.ranks, vec![Rank::Domain, Rank::Phylum, Rank::Class]);
    assert_eq!(label.deepest_rank(), Some(Rank::Class));
}

#[test]
fn test_parse_all_three_parts() {
    let label = NodeLabel::parse("85:Bacilli|C__").unwrap();
    assert_eq!(label.support, Some(85.0));
    assert_eq!(label.taxon.as_deref(), Some("Bacilli"));
    assert_eq!(label.ranks, vec![Rank::Class]);
}

#[test]
fn test_parse_invalid_rank_token() {
    assert_eq!(
        NodeLabel::parse("Bacilli|D__;Q__"),
        Err(UnknownRank("Q__".to_string()))
    );
}

// --- TESTS NODE LABEL ENCODING ---
#[test]
fn test_encode_round_trips() {
    for text in [
        "Bacilli",
        "85",
        "97:Bacilli",
        "Bacilli|D__;P__",
        "85:Bacilli|C__;O__",
    ] {
        let label = NodeLabel::parse(text).unwrap();
        assert_eq!(label.encode(), text);
    }
}

#[test]
fn test_name_text_excludes_ranks() {
    let label = NodeLabel::parse("85:Bacilli|C__").unwrap();
    assert_eq!(label.name_text(), "85:Bacilli");
}

#[test]
fn test_display_matches_encode() {
    let label = NodeLabel::parse("97:Bacilli|D__").unwrap();
    assert_eq!(label.to_string(), label.encode());
}
