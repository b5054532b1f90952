//! Structured node labels and their textual codec.
//!
//! Tree files in the wild multiplex up to three pieces of information into a
//! single node name: a bootstrap support value, the taxon text, and a run of
//! assigned rank tokens. [NodeLabel] keeps the three apart; the multiplexed
//! string only exists at the Newick boundary via [NodeLabel::parse] and
//! [NodeLabel::encode].
//!
//! # Format
//! * `support ::= number` (leading, separated from the taxon by `:`)
//! * `ranks ::= '|' prefix (';' prefix)*` (trailing)
//! * A name that is nothing but a number is read as a support value.
//!
//! Examples: `97:Bacilli`, `Bacilli|D__;P__`, `85`, `85:Bacilli|C__`.

use std::fmt;

use crate::taxonomy::rank::{Rank, UnknownRank};

/// Separates the support value from the taxon text.
const SUPPORT_SEPARATOR: char = ':';
/// Separates the taxon text from the rank run.
const RANK_SEPARATOR: char = '|';
/// Joins rank tokens within a run.
const RANK_JOINER: char = ';';

/// Everything a node name can carry, decomposed.
///
/// `ranks` is ordered shallowest first; when the marker back-fills a gap the
/// run is consecutive. An empty label encodes to the empty string (unnamed
/// vertices).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    /// Bootstrap support, if the name carried one.
    pub support: Option<f64>,
    /// Free-text taxon name, if any.
    pub taxon: Option<String>,
    /// Assigned rank run, shallowest first; empty when unranked.
    pub ranks: Vec<Rank>,
}

impl NodeLabel {
    /// Creates a label carrying only a taxon text.
    pub fn taxon<S: Into<String>>(taxon: S) -> Self {
        NodeLabel {
            support: None,
            taxon: Some(taxon.into()),
            ranks: Vec::new(),
        }
    }

    /// Returns `true` if neither support, taxon, nor ranks are present.
    pub fn is_empty(&self) -> bool {
        self.support.is_none() && self.taxon.is_none() && self.ranks.is_empty()
    }

    /// Returns the deepest assigned rank, or `None` when unranked.
    pub fn deepest_rank(&self) -> Option<Rank> {
        self.ranks.last().copied()
    }

    /// Returns `true` if a rank run has been assigned.
    pub fn has_ranks(&self) -> bool {
        !self.ranks.is_empty()
    }

    /// Decodes a multiplexed name into its parts.
    ///
    /// # Arguments
    /// * `text` - The raw (unescaped) node name
    ///
    /// # Errors
    /// Returns [UnknownRank] if the name carries a rank run with a token
    /// that is not a known rank prefix.
    pub fn parse(text: &str) -> Result<NodeLabel, UnknownRank> {
        if text.is_empty() {
            return Ok(NodeLabel::default());
        }

        let (head, rank_part) = match text.split_once(RANK_SEPARATOR) {
            Some((head, ranks)) => (head, Some(ranks)),
            None => (text, None),
        };

        let mut ranks = Vec::new();
        if let Some(rank_part) = rank_part {
            for token in rank_part.split(RANK_JOINER) {
                let rank =
                    Rank::from_prefix(token).ok_or_else(|| UnknownRank(token.to_string()))?;
                ranks.push(rank);
            }
        }

        let (support, taxon) = match head.split_once(SUPPORT_SEPARATOR) {
            Some((prefix, rest)) => match prefix.parse::<f64>() {
                // "97:Bacilli"
                Ok(support) => (Some(support), non_empty(rest)),
                // ':' present but no leading number; keep the whole text
                Err(_) => (None, non_empty(head)),
            },
            None => match head.parse::<f64>() {
                // A bare number is a support value
                Ok(support) => (Some(support), None),
                Err(_) => (None, non_empty(head)),
            },
        };

        Ok(NodeLabel {
            support,
            taxon,
            ranks,
        })
    }

    /// Encodes the label back into its multiplexed textual form.
    ///
    /// The result is not escaped for Newick; the writer takes care of that.
    pub fn encode(&self) -> String {
        let mut out = self.name_text();

        if !self.ranks.is_empty() {
            out.push(RANK_SEPARATOR);
            for (i, rank) in self.ranks.iter().enumerate() {
                if i > 0 {
                    out.push(RANK_JOINER);
                }
                out.push_str(rank.prefix());
            }
        }

        out
    }

    /// Encodes only the support/taxon part, without any rank run.
    pub fn name_text(&self) -> String {
        match (&self.support, &self.taxon) {
            (Some(support), Some(taxon)) => format!("{support}{SUPPORT_SEPARATOR}{taxon}"),
            (Some(support), None) => support.to_string(),
            (None, Some(taxon)) => taxon.clone(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
