//! The fixed ladder of taxonomic ranks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A level in the taxonomic hierarchy.
///
/// The order is total: `Domain < Phylum < ... < Species < Strain`.
/// Discriminants double as indices into [Rank::ALL], so
/// `rank as usize == rank.index()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Domain = 0,
    Phylum = 1,
    Class = 2,
    Order = 3,
    Family = 4,
    Genus = 5,
    Species = 6,
    Strain = 7,
}

/// Error returned when a string is not a rank prefix or rank name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a taxonomic rank")]
pub struct UnknownRank(pub String);

impl Rank {
    /// All ranks, shallowest first.
    pub const ALL: [Rank; 8] = [
        Rank::Domain,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
        Rank::Strain,
    ];

    /// Prefix tokens as they appear in serialized labels.
    const PREFIXES: [&'static str; 8] = ["D__", "P__", "C__", "O__", "F__", "G__", "S__", "ST__"];

    /// Returns the position of this rank in the hierarchy (0 = domain).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the rank at the given position in the hierarchy.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn from_index(index: usize) -> Rank {
        Rank::ALL[index]
    }

    /// Returns the prefix token of this rank, e.g. `P__` for phylum.
    pub fn prefix(self) -> &'static str {
        Rank::PREFIXES[self.index()]
    }

    /// Returns the rank matching the given prefix token, if any.
    pub fn from_prefix(prefix: &str) -> Option<Rank> {
        Rank::PREFIXES
            .iter()
            .position(|&p| p == prefix)
            .map(Rank::from_index)
    }

    /// Returns the next deeper rank, or `None` for [Rank::Strain].
    pub fn next(self) -> Option<Rank> {
        Rank::ALL.get(self.index() + 1).copied()
    }

    /// Returns the full lowercase name of this rank.
    pub fn name(self) -> &'static str {
        match self {
            Rank::Domain => "domain",
            Rank::Phylum => "phylum",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
            Rank::Strain => "strain",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rank {
    type Err = UnknownRank;

    /// Parses either a prefix token (`D__`) or a full name (`domain`),
    /// the latter case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rank) = Rank::from_prefix(s) {
            return Ok(rank);
        }

        let lower = s.to_ascii_lowercase();
        Rank::ALL
            .iter()
            .find(|r| r.name() == lower)
            .copied()
            .ok_or_else(|| UnknownRank(s.to_string()))
    }
}
